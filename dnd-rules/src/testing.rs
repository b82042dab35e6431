//! Testing utilities.
//!
//! - [`ScriptedDice`] replays fixed die values and records every draw
//! - [`sample_fighter`] and [`sample_rogue`] build ready-to-fight characters
//!   against [`Catalog::standard`]

use crate::dice::DiceSource;
use crate::items::{Catalog, EquipmentItem, WeaponCategory};
use crate::world::{Ability, AbilityScores, Character, EquipmentSlot};
use std::collections::VecDeque;

/// A dice source that returns scripted values in order.
///
/// Use this for deterministic tests. Values are returned as-is, whatever die
/// is being rolled, so a script can force any outcome.
///
/// # Panics
///
/// Rolling after the script runs out panics; a test that draws more dice
/// than it scripted is a broken test.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    script: VecDeque<u32>,
    draws: Vec<(u32, u32)>,
}

impl ScriptedDice {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            script: values.into_iter().collect(),
            draws: Vec::new(),
        }
    }

    /// Queue more values after the current script.
    pub fn push(&mut self, value: u32) {
        self.script.push_back(value);
    }

    /// Every draw so far, as `(sides, value)`.
    pub fn draws(&self) -> &[(u32, u32)] {
        &self.draws
    }

    /// Number of scripted values not yet drawn.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl DiceSource for ScriptedDice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        let Some(value) = self.script.pop_front() else {
            panic!(
                "ScriptedDice exhausted after {} draws (wanted a d{sides})",
                self.draws.len()
            );
        };
        self.draws.push((sides, value));
        value
    }
}

fn weapon_families(catalog: &Catalog, category: Option<WeaponCategory>) -> Vec<String> {
    catalog
        .equipment()
        .filter_map(|item| match item {
            EquipmentItem::Weapon(w) if category.map_or(true, |c| w.weapon_category == c) => {
                Some(w.family.clone())
            }
            _ => None,
        })
        .collect()
}

/// A level 3 fighter in chain mail with a longsword and shield.
pub fn sample_fighter(name: &str) -> Character {
    let mut character = Character::new(name)
        .with_level(3)
        .with_ability_scores(AbilityScores::new(16, 14, 14, 10, 12, 8))
        .with_equipped(EquipmentSlot::Body, "chain-mail")
        .with_equipped(EquipmentSlot::MainHand, "longsword")
        .with_equipped(EquipmentSlot::OffHand, "shield")
        .with_equipped(EquipmentSlot::RangedMainHand, "light-crossbow");

    character.saving_throw_proficiencies.insert(Ability::Strength);
    character
        .saving_throw_proficiencies
        .insert(Ability::Constitution);

    for skill in ["athletics", "perception", "intimidation"] {
        character.skill_proficiencies.insert(skill.to_string());
    }

    character
        .weapon_proficiencies
        .extend(weapon_families(Catalog::standard(), None));
    for armor in ["light", "medium", "heavy", "shield"] {
        character.armor_proficiencies.insert(armor.to_string());
    }

    character
}

/// A level 3 rogue in leather, with a rapier, an off-hand dagger and a shortbow.
pub fn sample_rogue(name: &str) -> Character {
    let mut character = Character::new(name)
        .with_level(3)
        .with_ability_scores(AbilityScores::new(8, 17, 14, 12, 10, 13))
        .with_equipped(EquipmentSlot::Body, "leather")
        .with_equipped(EquipmentSlot::MainHand, "rapier")
        .with_equipped(EquipmentSlot::OffHand, "dagger")
        .with_equipped(EquipmentSlot::RangedMainHand, "shortbow");

    character.saving_throw_proficiencies.insert(Ability::Dexterity);
    character
        .saving_throw_proficiencies
        .insert(Ability::Intelligence);

    for skill in ["acrobatics", "deception", "perception", "stealth", "sleight-of-hand"] {
        character.skill_proficiencies.insert(skill.to_string());
    }
    for skill in ["stealth", "sleight-of-hand"] {
        character.skill_expertise.insert(skill.to_string());
    }

    character.weapon_proficiencies.extend(weapon_families(
        Catalog::standard(),
        Some(WeaponCategory::Simple),
    ));
    for family in ["hand-crossbow", "longsword", "rapier", "shortsword"] {
        character.weapon_proficiencies.insert(family.to_string());
    }
    character.armor_proficiencies.insert("light".to_string());

    character
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_dice_records_draws() {
        let mut dice = ScriptedDice::new([3, 19]);
        assert_eq!(dice.roll_die(6), 3);
        dice.push(7);
        assert_eq!(dice.roll_die(20), 19);
        assert_eq!(dice.remaining(), 1);
        assert_eq!(dice.draws(), &[(6, 3), (20, 19)]);
    }

    #[test]
    #[should_panic(expected = "exhausted")]
    fn test_scripted_dice_panics_when_empty() {
        let mut dice = ScriptedDice::default();
        dice.roll_die(20);
    }

    #[test]
    fn test_sample_characters() {
        let fighter = sample_fighter("Gorm");
        assert!(fighter.is_proficient_with_weapon("greatsword"));
        assert!(fighter.is_proficient_with_weapon("dagger"));
        assert!(fighter
            .saving_throw_proficiencies
            .contains(&Ability::Constitution));

        let rogue = sample_rogue("Vex");
        assert!(rogue.is_proficient_with_weapon("rapier"));
        assert!(rogue.is_proficient_with_weapon("shortbow"));
        assert!(!rogue.is_proficient_with_weapon("greatsword"));
        assert!(rogue.skill_expertise.contains("stealth"));
    }
}
