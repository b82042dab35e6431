//! D&D 5e rules engine.
//!
//! The engine borrows a [`Catalog`] and resolves attacks and checks for
//! read-only [`Character`] snapshots. It never mutates a character; callers
//! apply the results however their game loop sees fit.
//!
//! An attack runs the same pipeline for every hand:
//! 1. Resolve the equipped weapon from the hand's slot
//! 2. Pick the acting ability and collect attack modifiers
//! 3. Roll a d20 against the defender's armor class
//! 4. On a hit, roll base and extra damage (doubled on a critical hit)

use crate::armor::{self, ArmorClassResult};
use crate::check::{roll20, D20Check, RollOutcome};
use crate::config::RulesConfig;
use crate::damage::{damage_roll, Damage, DamageRollResult};
use crate::dice::{Advantage, DiceSource};
use crate::error::{Result, RulesError};
use crate::items::{Catalog, Weapon, WeaponProperty};
use crate::modifiers::{self, Modifier};
use crate::world::{Ability, Character, EquipmentSlot};
use serde::{Deserialize, Serialize};

/// Which weapon an attack is made with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackHand {
    MainHand,
    OffHand,
    Ranged,
}

impl AttackHand {
    pub fn slot(&self) -> EquipmentSlot {
        match self {
            AttackHand::MainHand => EquipmentSlot::MainHand,
            AttackHand::OffHand => EquipmentSlot::OffHand,
            AttackHand::Ranged => EquipmentSlot::RangedMainHand,
        }
    }
}

/// Who attacks whom, and with what roll mode.
#[derive(Debug, Clone, Copy)]
pub struct AttackOptions<'a> {
    pub attacker: &'a Character,
    pub defender: &'a Character,
    pub advantage: Advantage,
}

impl<'a> AttackOptions<'a> {
    pub fn new(attacker: &'a Character, defender: &'a Character) -> Self {
        Self {
            attacker,
            defender,
            advantage: Advantage::Normal,
        }
    }

    pub fn with_advantage(mut self, advantage: Advantage) -> Self {
        self.advantage = advantage;
        self
    }
}

/// The attack roll, plus the damage when it hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackResult {
    pub attack_roll: RollOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_roll: Option<DamageRollResult>,
}

impl AttackResult {
    pub fn is_hit(&self) -> bool {
        self.attack_roll.success
    }

    /// Total damage dealt, zero on a miss.
    pub fn damage(&self) -> i32 {
        self.damage_roll.as_ref().map_or(0, |d| d.total)
    }
}

/// The rules engine.
#[derive(Debug, Clone)]
pub struct RulesEngine<'c> {
    catalog: &'c Catalog,
    config: RulesConfig,
}

impl<'c> RulesEngine<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self::with_config(catalog, RulesConfig::default())
    }

    pub fn with_config(catalog: &'c Catalog, config: RulesConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    // ========================================================================
    // Attacks
    // ========================================================================

    /// Attack with the main-hand melee weapon.
    pub fn main_hand_attack<D: DiceSource + ?Sized>(
        &self,
        dice: &mut D,
        options: &AttackOptions<'_>,
    ) -> Result<AttackResult> {
        self.attack(dice, AttackHand::MainHand, options)
    }

    /// Attack with the off-hand weapon, which must be light.
    ///
    /// The ability modifier is left off the damage unless
    /// [`RulesConfig::off_hand_ability_damage`] is set.
    pub fn off_hand_attack<D: DiceSource + ?Sized>(
        &self,
        dice: &mut D,
        options: &AttackOptions<'_>,
    ) -> Result<AttackResult> {
        self.attack(dice, AttackHand::OffHand, options)
    }

    /// Attack with the ranged main-hand weapon, which must be ranged or thrown.
    pub fn ranged_attack<D: DiceSource + ?Sized>(
        &self,
        dice: &mut D,
        options: &AttackOptions<'_>,
    ) -> Result<AttackResult> {
        self.attack(dice, AttackHand::Ranged, options)
    }

    /// Attack with whatever is equipped for `hand`.
    pub fn attack<D: DiceSource + ?Sized>(
        &self,
        dice: &mut D,
        hand: AttackHand,
        options: &AttackOptions<'_>,
    ) -> Result<AttackResult> {
        let attacker = options.attacker;
        let weapon = self.equipped_weapon(attacker, hand)?;
        let ability = attack_ability(attacker, weapon, hand);

        let check = D20Check::new(self.armor_class(options.defender)?.total)
            .with_modifiers(modifiers::attack_modifiers(attacker, weapon, ability)?)
            .with_advantage(options.advantage);
        let attack_roll = roll20(dice, &check);

        if !attack_roll.success {
            tracing::debug!(
                attacker = %attacker.name,
                defender = %options.defender.name,
                ?hand,
                weapon = %weapon.index,
                "attack missed"
            );
            return Ok(AttackResult {
                attack_roll,
                damage_roll: None,
            });
        }

        let profile = damage_profile(attacker, weapon, hand)?;
        let critical = attack_roll.is_critical_hit();

        let base = damage_roll(dice, options.defender, profile, critical)?;
        let mut extras = Vec::with_capacity(weapon.extra_damages.len());
        for extra in &weapon.extra_damages {
            extras.push(damage_roll(dice, options.defender, extra, critical)?);
        }

        let mut flat = Vec::new();
        if hand != AttackHand::OffHand || self.config.off_hand_ability_damage {
            flat.extend(Modifier::ability(attacker, ability)?);
        }
        if let Some(bonus) = weapon.enchantment.filter(|b| *b != 0) {
            flat.push(Modifier::new("weapon_enchantment", bonus).with_index(&weapon.index));
        }

        let damage = DamageRollResult::new(base, extras, flat);
        tracing::debug!(
            attacker = %attacker.name,
            defender = %options.defender.name,
            ?hand,
            weapon = %weapon.index,
            critical,
            damage = damage.total,
            "attack hit"
        );

        Ok(AttackResult {
            attack_roll,
            damage_roll: Some(damage),
        })
    }

    /// The weapon equipped for `hand`, checked against that hand's requirements.
    pub fn equipped_weapon(&self, character: &Character, hand: AttackHand) -> Result<&'c Weapon> {
        let slot = hand.slot();
        let id = character
            .equipment
            .get(slot)
            .ok_or_else(|| RulesError::not_found("equipped weapon", slot.name()))?;
        let weapon = self.catalog.weapon(id)?;

        match hand {
            AttackHand::MainHand => {}
            AttackHand::OffHand => {
                if !weapon.has_property(WeaponProperty::Light) {
                    return Err(RulesError::InvalidOffhand(weapon.name.clone()));
                }
            }
            AttackHand::Ranged => {
                if !weapon.is_ranged() && !weapon.has_property(WeaponProperty::Thrown) {
                    return Err(RulesError::WrongCategory {
                        id: id.to_string(),
                        expected: "a ranged or thrown weapon",
                    });
                }
            }
        }

        Ok(weapon)
    }

    // ========================================================================
    // Checks
    // ========================================================================

    /// Roll a skill check against `dc`.
    ///
    /// Stealth picks up disadvantage from body armor that imposes it.
    pub fn skill_check<D: DiceSource + ?Sized>(
        &self,
        dice: &mut D,
        character: &Character,
        skill_id: &str,
        dc: i32,
        advantage: Advantage,
    ) -> Result<RollOutcome> {
        let skill = self.catalog.skill(skill_id)?;
        let modifiers = modifiers::skill_check_modifiers(character, skill)?;

        let mut advantage = advantage;
        if skill.index == "stealth" {
            let noisy = armor::body_armor(character, self.catalog)?
                .is_some_and(|armor| armor.stealth_disadvantage);
            if noisy {
                advantage = advantage.combine(Advantage::Disadvantage);
            }
        }

        let check = D20Check::new(dc)
            .with_modifiers(modifiers)
            .with_advantage(advantage);
        Ok(roll20(dice, &check))
    }

    /// Roll a raw ability check against `dc`.
    pub fn ability_check<D: DiceSource + ?Sized>(
        &self,
        dice: &mut D,
        character: &Character,
        ability: Ability,
        dc: i32,
        advantage: Advantage,
    ) -> Result<RollOutcome> {
        let check = D20Check::new(dc)
            .with_modifiers(modifiers::ability_check_modifiers(character, ability)?)
            .with_advantage(advantage);
        Ok(roll20(dice, &check))
    }

    /// Roll a saving throw against `dc`.
    pub fn saving_throw<D: DiceSource + ?Sized>(
        &self,
        dice: &mut D,
        character: &Character,
        ability: Ability,
        dc: i32,
        advantage: Advantage,
    ) -> Result<RollOutcome> {
        let check = D20Check::new(dc)
            .with_modifiers(modifiers::saving_throw_modifiers(character, ability)?)
            .with_advantage(advantage);
        Ok(roll20(dice, &check))
    }

    /// Armor class of `character` under this engine's catalog and config.
    pub fn armor_class(&self, character: &Character) -> Result<ArmorClassResult> {
        armor::armor_class(character, self.catalog, &self.config)
    }
}

/// Ranged weapons use dexterity; everything else follows the finesse rule.
fn attack_ability(character: &Character, weapon: &Weapon, hand: AttackHand) -> Ability {
    if hand == AttackHand::Ranged && weapon.is_ranged() {
        Ability::Dexterity
    } else {
        modifiers::weapon_ability(character, weapon)
    }
}

/// The damage profile for this swing.
///
/// Two-handed weapons always use their two-handed profile. A versatile melee
/// weapon is wielded two-handed when the off hand is free.
fn damage_profile<'w>(
    character: &Character,
    weapon: &'w Weapon,
    hand: AttackHand,
) -> Result<&'w Damage> {
    let two_handed = weapon.has_property(WeaponProperty::TwoHanded)
        || (hand != AttackHand::Ranged
            && weapon.has_property(WeaponProperty::Versatile)
            && character.equipment.is_empty(EquipmentSlot::OffHand));

    let profile = if two_handed {
        weapon.two_handed.as_ref()
    } else {
        weapon.one_handed.as_ref()
    };
    profile.ok_or_else(|| RulesError::MissingDamageProfile(weapon.index.clone()))
}
