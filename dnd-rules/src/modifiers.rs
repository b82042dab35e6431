//! Named numeric modifiers and the rules that produce them.
//!
//! A modifier list never contains a zero-valued entry: each aggregator drops
//! zeros at the point it computes them.

use crate::error::{Result, RulesError};
use crate::items::{SkillEntry, Weapon, WeaponProperty};
use crate::world::{Ability, Character};
use serde::{Deserialize, Serialize};

/// A named contribution to a roll or to armor class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    /// Semantic tag, e.g. `ability_strength`, `proficiency_longsword`, `shield_bonus`.
    pub source: String,
    /// The referenced trait id, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    pub value: i32,
}

impl Modifier {
    pub fn new(source: impl Into<String>, value: i32) -> Self {
        Self {
            source: source.into(),
            index: None,
            value,
        }
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Ability modifier entry, or `None` when the modifier is zero.
    pub fn ability(character: &Character, ability: Ability) -> Result<Option<Self>> {
        let value = ability_modifier(character.score(ability))?;
        Ok((value != 0).then(|| {
            Modifier::new(format!("ability_{}", ability.index()), value).with_index(ability.index())
        }))
    }

    pub fn sum(modifiers: &[Modifier]) -> i32 {
        modifiers.iter().map(|m| m.value).sum()
    }
}

/// `floor((score - 10) / 2)`. Scores below 1 are rejected.
pub fn ability_modifier(score: u8) -> Result<i32> {
    if score < 1 {
        return Err(RulesError::InvalidScore(format!(
            "ability score cannot be less than 1 (got {score})"
        )));
    }
    Ok((i32::from(score) - 10).div_euclid(2))
}

/// `ceil(level / 4) + 1`. Levels below 1 are rejected.
pub fn proficiency_bonus(level: u8) -> Result<i32> {
    if level < 1 {
        return Err(RulesError::InvalidScore(format!(
            "level cannot be less than 1 (got {level})"
        )));
    }
    Ok((i32::from(level) + 3) / 4 + 1)
}

/// Modifiers for a skill check: ability, then expertise or proficiency.
///
/// Expertise replaces proficiency, it never stacks with it.
pub fn skill_check_modifiers(character: &Character, skill: &SkillEntry) -> Result<Vec<Modifier>> {
    let mut modifiers = Vec::new();
    modifiers.extend(Modifier::ability(character, skill.ability)?);

    let pb = proficiency_bonus(character.level)?;
    if character.skill_expertise.contains(&skill.index) {
        modifiers.push(
            Modifier::new(format!("expertise_{}", skill.index), pb * 2).with_index(&skill.index),
        );
    } else if character.skill_proficiencies.contains(&skill.index) {
        modifiers
            .push(Modifier::new(format!("proficiency_{}", skill.index), pb).with_index(&skill.index));
    }

    Ok(modifiers)
}

/// Modifiers for a raw ability check.
pub fn ability_check_modifiers(character: &Character, ability: Ability) -> Result<Vec<Modifier>> {
    Ok(Modifier::ability(character, ability)?.into_iter().collect())
}

/// Modifiers for a saving throw: ability, plus proficiency if proficient in that save.
pub fn saving_throw_modifiers(character: &Character, ability: Ability) -> Result<Vec<Modifier>> {
    let mut modifiers = ability_check_modifiers(character, ability)?;
    if character.saving_throw_proficiencies.contains(&ability) {
        let pb = proficiency_bonus(character.level)?;
        modifiers.push(Modifier::new("proficiency_save", pb).with_index(ability.index()));
    }
    Ok(modifiers)
}

/// The ability a melee weapon attacks with.
///
/// Strength, unless the weapon is finesse and dexterity is strictly higher.
pub fn weapon_ability(character: &Character, weapon: &Weapon) -> Ability {
    if weapon.has_property(WeaponProperty::Finesse)
        && character.score(Ability::Dexterity) > character.score(Ability::Strength)
    {
        Ability::Dexterity
    } else {
        Ability::Strength
    }
}

/// Weapon proficiency entry, if the character is proficient with the weapon's family.
pub fn weapon_proficiency(character: &Character, weapon: &Weapon) -> Result<Option<Modifier>> {
    if !character.is_proficient_with_weapon(&weapon.family) {
        return Ok(None);
    }
    let pb = proficiency_bonus(character.level)?;
    Ok(Some(
        Modifier::new(format!("proficiency_{}", weapon.family), pb).with_index(&weapon.family),
    ))
}

/// Attack roll modifiers for `weapon` swung with `ability`.
pub fn attack_modifiers(
    character: &Character,
    weapon: &Weapon,
    ability: Ability,
) -> Result<Vec<Modifier>> {
    let mut modifiers = Vec::new();
    modifiers.extend(Modifier::ability(character, ability)?);
    modifiers.extend(weapon_proficiency(character, weapon)?);
    Ok(modifiers)
}

/// Attack roll modifiers for a melee weapon, choosing the ability by the finesse rule.
pub fn weapon_attack_modifiers(character: &Character, weapon: &Weapon) -> Result<Vec<Modifier>> {
    attack_modifiers(character, weapon, weapon_ability(character, weapon))
}
