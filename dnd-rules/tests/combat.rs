//! Attack resolution tests: main hand, off hand, criticals and failure modes.
//!
//! Run with logs: `RUST_LOG=dnd_rules=debug cargo test -p dnd-rules --test combat -- --nocapture`

use dnd_rules::items::WeaponCategory;
use dnd_rules::testing::{sample_fighter, sample_rogue, ScriptedDice};
use dnd_rules::{
    dice, Ability, AbilityScores, Advantage, AttackOptions, Catalog, Character, DamageAdjustment,
    DamageType, EquipmentSlot, RulesConfig, RulesEngine, RulesError, Weapon, WeaponProperty,
};
use tracing_subscriber::EnvFilter;

fn setup() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// The standard catalog plus a plain sword, a flaming blade and a weapon with no damage.
fn test_catalog() -> Catalog {
    let mut catalog = Catalog::standard().clone();
    catalog.insert(
        Weapon::new("sword", "Sword", WeaponCategory::Martial)
            .with_one_handed("1d8", DamageType::Slashing)
            .into(),
    );
    catalog.insert(
        Weapon::new("flame-tongue", "Flame Tongue", WeaponCategory::Martial)
            .with_family("sword")
            .with_one_handed("1d8", DamageType::Slashing)
            .with_extra_damage("2d6", DamageType::Fire)
            .with_enchantment(1)
            .into(),
    );
    catalog.insert(Weapon::new("broken-hilt", "Broken Hilt", WeaponCategory::Simple).into());
    catalog
}

/// Strength 16, level 5, proficient with swords.
fn swordsman() -> Character {
    let mut character = Character::new("Swordsman")
        .with_level(5)
        .with_ability_scores(AbilityScores::new(16, 10, 12, 10, 10, 10))
        .with_equipped(EquipmentSlot::MainHand, "sword");
    character.weapon_proficiencies.insert("sword".to_string());
    character
}

fn dummy() -> Character {
    Character::new("Training Dummy")
}

// =============================================================================
// Main hand
// =============================================================================

#[test]
fn test_main_hand_hit_adds_ability_to_damage() {
    setup();
    let catalog = test_catalog();
    let engine = RulesEngine::new(&catalog);
    let attacker = swordsman();
    let defender = dummy();

    let mut dice = ScriptedDice::new([15, 7, 6]);
    let result = engine
        .main_hand_attack(&mut dice, &AttackOptions::new(&attacker, &defender))
        .unwrap();

    let roll = &result.attack_roll;
    assert_eq!(roll.picked, 15);
    assert_eq!(roll.target, 10);
    assert_eq!(roll.total, Some(21));
    assert!(roll.success);
    let sources: Vec<_> = roll
        .modifiers
        .as_ref()
        .unwrap()
        .iter()
        .map(|m| m.source.as_str())
        .collect();
    assert_eq!(sources, ["ability_strength", "proficiency_sword"]);

    let damage = result.damage_roll.unwrap();
    assert_eq!(damage.base.rolled, 6);
    assert!(damage.extras.is_empty());
    assert_eq!(damage.total, 6 + 3);
    assert_eq!(dice.draws(), &[(20, 15), (20, 7), (8, 6)]);
}

#[test]
fn test_natural_1_always_misses() {
    setup();
    let catalog = test_catalog();
    let engine = RulesEngine::new(&catalog);
    let attacker = swordsman();
    let defender = dummy();

    let mut dice = ScriptedDice::new([1, 20]);
    let result = engine
        .main_hand_attack(&mut dice, &AttackOptions::new(&attacker, &defender))
        .unwrap();
    assert!(!result.is_hit());
    assert!(result.attack_roll.critical);
    assert!(result.damage_roll.is_none());
}

#[test]
fn test_natural_20_doubles_damage_dice_only() {
    setup();
    let catalog = test_catalog();
    let engine = RulesEngine::new(&catalog);
    let attacker = swordsman();
    let mut defender = dummy().with_equipped(EquipmentSlot::Body, "plate");
    defender.equipment.equip(EquipmentSlot::OffHand, "shield");

    // The crit skips the AC 20 comparison entirely.
    let mut dice = ScriptedDice::new([20, 1, 3, 4]);
    let result = engine
        .main_hand_attack(&mut dice, &AttackOptions::new(&attacker, &defender))
        .unwrap();
    assert_eq!(result.attack_roll.target, 20);
    assert!(result.attack_roll.is_critical_hit());
    assert_eq!(result.attack_roll.total, None);

    let damage = result.damage_roll.unwrap();
    assert_eq!(damage.base.rolled, 3 + 4);
    assert_eq!(damage.total, 3 + 4 + 3);
    assert_eq!(dice.draws()[2..], [(8, 3), (8, 4)]);
}

#[test]
fn test_critical_doubles_extra_damage_and_adjusts_each_type() {
    setup();
    let catalog = test_catalog();
    let engine = RulesEngine::new(&catalog);
    let attacker = swordsman().with_equipped(EquipmentSlot::MainHand, "flame-tongue");
    let mut defender = dummy();
    defender.resistances.insert(DamageType::Fire);

    let mut dice = ScriptedDice::new([20, 2, 8, 8, 1, 2, 3, 4]);
    let result = engine
        .main_hand_attack(&mut dice, &AttackOptions::new(&attacker, &defender))
        .unwrap();
    let damage = result.damage_roll.unwrap();

    assert_eq!(damage.base.rolled, 16);
    assert_eq!(damage.base.final_damage, 16);
    assert_eq!(damage.extras.len(), 1);
    assert_eq!(damage.extras[0].rolled, 10);
    assert_eq!(damage.extras[0].final_damage, 5);
    assert_eq!(damage.extras[0].adjustment, Some(DamageAdjustment::Resistance));

    let flat: Vec<_> = damage
        .modifiers
        .iter()
        .map(|m| (m.source.as_str(), m.value))
        .collect();
    assert_eq!(flat, [("ability_strength", 3), ("weapon_enchantment", 1)]);
    assert_eq!(damage.total, 16 + 5 + 3 + 1);
    assert_eq!(dice.remaining(), 0);
}

#[test]
fn test_advantage_on_attack() {
    setup();
    let catalog = test_catalog();
    let engine = RulesEngine::new(&catalog);
    let attacker = swordsman();
    let defender = dummy();

    let mut dice = ScriptedDice::new([3, 18, 5]);
    let options = AttackOptions::new(&attacker, &defender).with_advantage(Advantage::Advantage);
    let result = engine.main_hand_attack(&mut dice, &options).unwrap();
    assert_eq!(result.attack_roll.rolls, vec![3, 18]);
    assert_eq!(result.attack_roll.picked, 18);
    assert_eq!(result.damage(), 5 + 3);
}

// =============================================================================
// Off hand
// =============================================================================

/// Strength 12, dexterity 15, level 5, no weapon proficiencies, dagger in the off hand.
fn dual_wielder() -> Character {
    Character::new("Dual Wielder")
        .with_level(5)
        .with_ability_scores(AbilityScores::new(12, 15, 10, 10, 10, 10))
        .with_equipped(EquipmentSlot::MainHand, "shortsword")
        .with_equipped(EquipmentSlot::OffHand, "dagger")
}

#[test]
fn test_off_hand_excludes_ability_from_damage() {
    setup();
    let engine = RulesEngine::new(Catalog::standard());
    let attacker = dual_wielder();
    let defender = dummy();

    let mut dice = ScriptedDice::new([11, 4, 3]);
    let result = engine
        .off_hand_attack(&mut dice, &AttackOptions::new(&attacker, &defender))
        .unwrap();
    assert_eq!(result.attack_roll.total, Some(11 + 2));
    assert!(result.is_hit());

    let damage = result.damage_roll.unwrap();
    assert_eq!(damage.base.dice, "1d4");
    assert!(damage.modifiers.is_empty());
    assert_eq!(damage.total, 3);
}

#[test]
fn test_off_hand_ability_damage_override() {
    setup();
    let config = RulesConfig::new().with_off_hand_ability_damage(true);
    let engine = RulesEngine::with_config(Catalog::standard(), config);
    let attacker = dual_wielder();
    let defender = dummy();

    let mut dice = ScriptedDice::new([11, 4, 3]);
    let result = engine
        .off_hand_attack(&mut dice, &AttackOptions::new(&attacker, &defender))
        .unwrap();
    let damage = result.damage_roll.unwrap();
    assert_eq!(damage.modifiers[0].source, "ability_dexterity");
    assert_eq!(damage.total, 3 + 2);
}

#[test]
fn test_off_hand_requires_light_weapon() {
    setup();
    let engine = RulesEngine::new(Catalog::standard());
    let attacker = dual_wielder().with_equipped(EquipmentSlot::OffHand, "longsword");
    let defender = dummy();

    let err = engine
        .off_hand_attack(
            &mut ScriptedDice::default(),
            &AttackOptions::new(&attacker, &defender),
        )
        .unwrap_err();
    assert!(matches!(err, RulesError::InvalidOffhand(name) if name == "Longsword"));
}

#[test]
fn test_off_hand_shield_is_not_a_weapon() {
    setup();
    let engine = RulesEngine::new(Catalog::standard());
    let attacker = sample_fighter("Gorm");
    let defender = dummy();

    let err = engine
        .off_hand_attack(
            &mut ScriptedDice::default(),
            &AttackOptions::new(&attacker, &defender),
        )
        .unwrap_err();
    assert!(matches!(err, RulesError::WrongCategory { id, .. } if id == "shield"));
}

// =============================================================================
// Failure modes
// =============================================================================

#[test]
fn test_empty_slot_is_not_found() {
    setup();
    let engine = RulesEngine::new(Catalog::standard());
    let attacker = Character::new("Unarmed");
    let defender = dummy();

    let err = engine
        .main_hand_attack(
            &mut ScriptedDice::default(),
            &AttackOptions::new(&attacker, &defender),
        )
        .unwrap_err();
    assert!(matches!(err, RulesError::NotFound { id, .. } if id == "main_hand"));
}

#[test]
fn test_unknown_weapon_is_not_found() {
    setup();
    let engine = RulesEngine::new(Catalog::standard());
    let attacker = Character::new("Dreamer").with_equipped(EquipmentSlot::MainHand, "vorpal-sword");
    let defender = dummy();

    let err = engine
        .main_hand_attack(
            &mut ScriptedDice::default(),
            &AttackOptions::new(&attacker, &defender),
        )
        .unwrap_err();
    assert!(matches!(&err, RulesError::NotFound { id, .. } if id == "vorpal-sword"));
    assert_eq!(err.to_string(), "weapon not found: vorpal-sword");
}

#[test]
fn test_armor_in_weapon_slot_is_wrong_category() {
    setup();
    let engine = RulesEngine::new(Catalog::standard());
    let attacker = Character::new("Odd").with_equipped(EquipmentSlot::MainHand, "plate");
    let defender = dummy();

    let err = engine
        .main_hand_attack(
            &mut ScriptedDice::default(),
            &AttackOptions::new(&attacker, &defender),
        )
        .unwrap_err();
    assert!(matches!(err, RulesError::WrongCategory { .. }));
}

#[test]
fn test_missing_damage_profile_surfaces_on_hit() {
    setup();
    let catalog = test_catalog();
    let engine = RulesEngine::new(&catalog);
    let attacker = swordsman().with_equipped(EquipmentSlot::MainHand, "broken-hilt");
    let defender = dummy();

    // A miss never looks at the damage profile.
    let mut dice = ScriptedDice::new([2, 2]);
    let result = engine
        .main_hand_attack(&mut dice, &AttackOptions::new(&attacker, &defender))
        .unwrap();
    assert!(!result.is_hit());

    let mut dice = ScriptedDice::new([15, 2]);
    let err = engine
        .main_hand_attack(&mut dice, &AttackOptions::new(&attacker, &defender))
        .unwrap_err();
    assert!(matches!(err, RulesError::MissingDamageProfile(id) if id == "broken-hilt"));
}

#[test]
fn test_invalid_ability_score_propagates() {
    setup();
    let catalog = test_catalog();
    let engine = RulesEngine::new(&catalog);
    let mut attacker = swordsman();
    attacker.ability_scores.set(Ability::Strength, 0);
    let defender = dummy();

    let err = engine
        .main_hand_attack(
            &mut ScriptedDice::default(),
            &AttackOptions::new(&attacker, &defender),
        )
        .unwrap_err();
    assert!(matches!(err, RulesError::InvalidScore(_)));
}

// =============================================================================
// Randomized
// =============================================================================

#[test]
fn test_seeded_attacks_stay_in_bounds() {
    setup();
    let engine = RulesEngine::new(Catalog::standard());
    let fighter = sample_fighter("Gorm");
    let rogue = sample_rogue("Vex");
    let options = AttackOptions::new(&fighter, &rogue);
    let mut rng = dice::seeded(42);

    for _ in 0..500 {
        let result = engine.main_hand_attack(&mut rng, &options).unwrap();
        assert_eq!(result.is_hit(), result.damage_roll.is_some());
        match &result.damage_roll {
            Some(damage) if result.attack_roll.is_critical_hit() => {
                assert!((2 + 3..=16 + 3).contains(&damage.total));
            }
            Some(damage) => {
                assert!((1 + 3..=8 + 3).contains(&damage.total));
                assert!(result.attack_roll.total.unwrap() >= 14);
            }
            None => {}
        }
    }
}

#[test]
fn test_same_seed_same_fight() {
    setup();
    let engine = RulesEngine::new(Catalog::standard());
    let fighter = sample_fighter("Gorm");
    let rogue = sample_rogue("Vex");
    let options = AttackOptions::new(&rogue, &fighter);

    let fight = |seed| {
        let mut rng = dice::seeded(seed);
        (0..20)
            .map(|_| engine.main_hand_attack(&mut rng, &options).unwrap())
            .collect::<Vec<_>>()
    };
    assert_eq!(fight(9), fight(9));
}

#[test]
fn test_attack_result_json_shape() {
    setup();
    let catalog = test_catalog();
    let engine = RulesEngine::new(&catalog);
    let attacker = swordsman();
    let defender = dummy();

    let mut dice = ScriptedDice::new([2, 2]);
    let miss = engine
        .main_hand_attack(&mut dice, &AttackOptions::new(&attacker, &defender))
        .unwrap();
    let json = serde_json::to_value(&miss).unwrap();
    assert!(json.get("damage_roll").is_none());
    assert_eq!(json["attack_roll"]["picked"], 2);

    let mut dice = ScriptedDice::new([15, 2, 8]);
    let hit = engine
        .main_hand_attack(&mut dice, &AttackOptions::new(&attacker, &defender))
        .unwrap();
    let json = serde_json::to_value(&hit).unwrap();
    assert_eq!(json["damage_roll"]["base"]["type"], "slashing");
    assert_eq!(json["damage_roll"]["base"]["final"], 8);
    assert_eq!(json["damage_roll"]["total"], 11);

    assert!(attacker.is_proficient_with_weapon("sword"));
    assert!(!catalog.weapon("sword").unwrap().has_property(WeaponProperty::Versatile));
}
