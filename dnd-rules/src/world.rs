//! D&D 5e character snapshot types.
//!
//! The resolution engine only reads these. Building and mutating characters
//! belongs to the surrounding character-management layer.

use crate::damage::DamageType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

// ============================================================================
// Ability Scores
// ============================================================================

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    /// Catalog index of the ability, e.g. `"strength"`.
    pub fn index(&self) -> &'static str {
        match self {
            Ability::Strength => "strength",
            Ability::Dexterity => "dexterity",
            Ability::Constitution => "constitution",
            Ability::Intelligence => "intelligence",
            Ability::Wisdom => "wisdom",
            Ability::Charisma => "charisma",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Ability scores container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: u8,
    pub dexterity: u8,
    pub constitution: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub charisma: u8,
}

impl AbilityScores {
    pub fn new(str: u8, dex: u8, con: u8, int: u8, wis: u8, cha: u8) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }

    pub fn get(&self, ability: Ability) -> u8 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, value: u8) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Charisma => self.charisma = value,
        }
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

// ============================================================================
// Equipment System
// ============================================================================

/// Equipment slots the rules engine reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    /// Body armor.
    Body,
    /// Melee main hand.
    MainHand,
    /// Melee off hand; holds a light weapon or a shield.
    OffHand,
    RangedMainHand,
}

impl EquipmentSlot {
    pub fn name(&self) -> &'static str {
        match self {
            EquipmentSlot::Body => "body",
            EquipmentSlot::MainHand => "main_hand",
            EquipmentSlot::OffHand => "off_hand",
            EquipmentSlot::RangedMainHand => "ranged_main_hand",
        }
    }
}

impl fmt::Display for EquipmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What's actively equipped, as slot to catalog item id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Equipment {
    slots: BTreeMap<EquipmentSlot, String>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipmentSlot) -> Option<&str> {
        self.slots.get(&slot).map(String::as_str)
    }

    pub fn is_empty(&self, slot: EquipmentSlot) -> bool {
        !self.slots.contains_key(&slot)
    }

    /// Put an item in a slot, returning whatever was there.
    pub fn equip(&mut self, slot: EquipmentSlot, item_id: impl Into<String>) -> Option<String> {
        self.slots.insert(slot, item_id.into())
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<String> {
        self.slots.remove(&slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EquipmentSlot, &str)> {
        self.slots.iter().map(|(slot, id)| (*slot, id.as_str()))
    }
}

// ============================================================================
// Character
// ============================================================================

/// A read-only character snapshot as the rules engine sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub level: u8,
    pub ability_scores: AbilityScores,

    // Skills & proficiencies
    /// Proficient skill ids.
    #[serde(default)]
    pub skill_proficiencies: HashSet<String>,
    /// Expertise skill ids. Expertise supersedes proficiency.
    #[serde(default)]
    pub skill_expertise: HashSet<String>,
    #[serde(default)]
    pub saving_throw_proficiencies: HashSet<Ability>,
    /// Weapon family ids, e.g. `"longsword"`.
    #[serde(default)]
    pub weapon_proficiencies: HashSet<String>,
    /// Armor category ids, e.g. `"light"`.
    #[serde(default)]
    pub armor_proficiencies: HashSet<String>,

    #[serde(default)]
    pub equipment: Equipment,

    // Defenses
    #[serde(default)]
    pub resistances: HashSet<DamageType>,
    #[serde(default)]
    pub vulnerabilities: HashSet<DamageType>,
    #[serde(default)]
    pub immunities: HashSet<DamageType>,
}

impl Character {
    /// A level 1 character with all scores at 10 and nothing equipped.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: 1,
            ability_scores: AbilityScores::default(),
            skill_proficiencies: HashSet::new(),
            skill_expertise: HashSet::new(),
            saving_throw_proficiencies: HashSet::new(),
            weapon_proficiencies: HashSet::new(),
            armor_proficiencies: HashSet::new(),
            equipment: Equipment::new(),
            resistances: HashSet::new(),
            vulnerabilities: HashSet::new(),
            immunities: HashSet::new(),
        }
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_ability_scores(mut self, scores: AbilityScores) -> Self {
        self.ability_scores = scores;
        self
    }

    pub fn with_equipped(mut self, slot: EquipmentSlot, item_id: impl Into<String>) -> Self {
        self.equipment.equip(slot, item_id);
        self
    }

    pub fn score(&self, ability: Ability) -> u8 {
        self.ability_scores.get(ability)
    }

    pub fn is_proficient_with_weapon(&self, family: &str) -> bool {
        self.weapon_proficiencies.contains(family)
    }
}
