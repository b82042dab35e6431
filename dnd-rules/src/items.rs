//! Equipment and skill catalog.
//!
//! A [`Catalog`] is read-only content handed to the rules engine. It can be
//! loaded from JSON or taken from the standard D&D 5e set in
//! [`Catalog::standard`].

use crate::damage::{Damage, DamageType};
use crate::error::{Result, RulesError};
use crate::world::Ability;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Weapons
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponCategory {
    Simple,
    Martial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponRange {
    #[default]
    Melee,
    Ranged,
}

/// Weapon properties per D&D 5e.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeaponProperty {
    Light,
    Finesse,
    Thrown,
    Versatile,
    Heavy,
    TwoHanded,
    Ammunition,
    Loading,
    Reach,
}

/// A weapon with D&D 5e properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub index: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub weapon_category: WeaponCategory,
    /// Proficiency family, e.g. `"longsword"` or `"hand-crossbow"`.
    pub family: String,
    #[serde(default)]
    pub range: WeaponRange,
    #[serde(default)]
    pub properties: Vec<WeaponProperty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_handed: Option<Damage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_handed: Option<Damage>,
    /// Riders such as `1d6 fire`, rolled alongside the base damage.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_damages: Vec<Damage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enchantment: Option<i32>,
}

impl Weapon {
    /// A weapon whose family is its own index.
    pub fn new(
        index: impl Into<String>,
        name: impl Into<String>,
        weapon_category: WeaponCategory,
    ) -> Self {
        let index = index.into();
        Self {
            family: index.clone(),
            index,
            name: name.into(),
            description: None,
            weapon_category,
            range: WeaponRange::Melee,
            properties: Vec::new(),
            one_handed: None,
            two_handed: None,
            extra_damages: Vec::new(),
            enchantment: None,
        }
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    pub fn ranged(mut self) -> Self {
        self.range = WeaponRange::Ranged;
        self
    }

    pub fn with_properties(mut self, properties: impl IntoIterator<Item = WeaponProperty>) -> Self {
        self.properties.extend(properties);
        self
    }

    pub fn with_one_handed(mut self, dice: &str, damage_type: DamageType) -> Self {
        self.one_handed = Some(Damage::new(dice, damage_type));
        self
    }

    pub fn with_two_handed(mut self, dice: &str, damage_type: DamageType) -> Self {
        self.two_handed = Some(Damage::new(dice, damage_type));
        self
    }

    pub fn with_extra_damage(mut self, dice: &str, damage_type: DamageType) -> Self {
        self.extra_damages.push(Damage::new(dice, damage_type));
        self
    }

    pub fn with_enchantment(mut self, bonus: i32) -> Self {
        self.enchantment = Some(bonus);
        self
    }

    pub fn has_property(&self, property: WeaponProperty) -> bool {
        self.properties.contains(&property)
    }

    pub fn is_ranged(&self) -> bool {
        self.range == WeaponRange::Ranged
    }
}

// ============================================================================
// Armor
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmorCategory {
    Light,
    Medium,
    Heavy,
    Shield,
}

/// Body armor or a shield. For a shield, `armor_class` is the bonus it grants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Armor {
    pub index: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub armor_category: ArmorCategory,
    pub armor_class: i32,
    #[serde(default)]
    pub stealth_disadvantage: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enchantment: Option<i32>,
}

impl Armor {
    pub fn new(
        index: impl Into<String>,
        name: impl Into<String>,
        armor_category: ArmorCategory,
        armor_class: i32,
    ) -> Self {
        Self {
            index: index.into(),
            name: name.into(),
            description: None,
            armor_category,
            armor_class,
            stealth_disadvantage: false,
            enchantment: None,
        }
    }

    pub fn with_stealth_disadvantage(mut self) -> Self {
        self.stealth_disadvantage = true;
        self
    }

    pub fn with_enchantment(mut self, bonus: i32) -> Self {
        self.enchantment = Some(bonus);
        self
    }

    pub fn is_shield(&self) -> bool {
        self.armor_category == ArmorCategory::Shield
    }
}

/// Anything equippable that isn't a weapon or armor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gear {
    pub index: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A catalog entry, tagged by its `category`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum EquipmentItem {
    Weapon(Weapon),
    #[serde(alias = "armour")]
    Armor(Armor),
    Gear(Gear),
}

impl EquipmentItem {
    pub fn index(&self) -> &str {
        match self {
            EquipmentItem::Weapon(w) => &w.index,
            EquipmentItem::Armor(a) => &a.index,
            EquipmentItem::Gear(g) => &g.index,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            EquipmentItem::Weapon(w) => &w.name,
            EquipmentItem::Armor(a) => &a.name,
            EquipmentItem::Gear(g) => &g.name,
        }
    }
}

// ============================================================================
// Skills
// ============================================================================

/// A skill and the ability it keys off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub index: String,
    pub name: String,
    pub ability: Ability,
}

impl SkillEntry {
    pub fn new(index: impl Into<String>, name: impl Into<String>, ability: Ability) -> Self {
        Self {
            index: index.into(),
            name: name.into(),
            ability,
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Equipment and skills, looked up by index.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    equipment: HashMap<String, EquipmentItem>,
    skills: HashMap<String, SkillEntry>,
}

#[derive(Deserialize)]
struct CatalogData {
    #[serde(default)]
    equipment: Vec<EquipmentItem>,
    #[serde(default)]
    skills: Vec<SkillEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `{ "equipment": [...], "skills": [...] }`.
    ///
    /// Later entries replace earlier ones with the same index.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: CatalogData = serde_json::from_str(json)?;
        let mut catalog = Catalog::new();
        for item in data.equipment {
            catalog.insert(item);
        }
        for skill in data.skills {
            catalog.insert_skill(skill);
        }
        tracing::debug!(
            equipment = catalog.equipment.len(),
            skills = catalog.skills.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// The standard D&D 5e weapons, armor and skills.
    pub fn standard() -> &'static Catalog {
        &STANDARD_CATALOG
    }

    pub fn insert(&mut self, item: EquipmentItem) -> Option<EquipmentItem> {
        self.equipment.insert(item.index().to_string(), item)
    }

    pub fn insert_skill(&mut self, skill: SkillEntry) -> Option<SkillEntry> {
        self.skills.insert(skill.index.clone(), skill)
    }

    pub fn with_item(mut self, item: impl Into<EquipmentItem>) -> Self {
        self.insert(item.into());
        self
    }

    pub fn with_skill(mut self, skill: SkillEntry) -> Self {
        self.insert_skill(skill);
        self
    }

    pub fn get(&self, id: &str) -> Option<&EquipmentItem> {
        self.equipment.get(id)
    }

    /// Look up a weapon, failing if the id is unknown or names something else.
    pub fn weapon(&self, id: &str) -> Result<&Weapon> {
        match self.get(id) {
            Some(EquipmentItem::Weapon(weapon)) => Ok(weapon),
            Some(_) => Err(RulesError::WrongCategory {
                id: id.to_string(),
                expected: "a weapon",
            }),
            None => Err(RulesError::not_found("weapon", id)),
        }
    }

    /// Look up armor or a shield, failing if the id is unknown or names something else.
    pub fn armor(&self, id: &str) -> Result<&Armor> {
        match self.get(id) {
            Some(EquipmentItem::Armor(armor)) => Ok(armor),
            Some(_) => Err(RulesError::WrongCategory {
                id: id.to_string(),
                expected: "armor",
            }),
            None => Err(RulesError::not_found("armor", id)),
        }
    }

    pub fn skill(&self, id: &str) -> Result<&SkillEntry> {
        self.skills
            .get(id)
            .ok_or_else(|| RulesError::not_found("skill", id))
    }

    pub fn equipment(&self) -> impl Iterator<Item = &EquipmentItem> {
        self.equipment.values()
    }

    pub fn skills(&self) -> impl Iterator<Item = &SkillEntry> {
        self.skills.values()
    }
}

impl From<Weapon> for EquipmentItem {
    fn from(weapon: Weapon) -> Self {
        EquipmentItem::Weapon(weapon)
    }
}

impl From<Armor> for EquipmentItem {
    fn from(armor: Armor) -> Self {
        EquipmentItem::Armor(armor)
    }
}

impl From<Gear> for EquipmentItem {
    fn from(gear: Gear) -> Self {
        EquipmentItem::Gear(gear)
    }
}

// ============================================================================
// Standard content
// ============================================================================

lazy_static::lazy_static! {
    static ref STANDARD_CATALOG: Catalog = {
        let mut catalog = Catalog::new();
        for weapon in standard_weapons() {
            catalog.insert(EquipmentItem::Weapon(weapon));
        }
        for armor in standard_armor() {
            catalog.insert(EquipmentItem::Armor(armor));
        }
        for skill in standard_skills() {
            catalog.insert_skill(skill);
        }
        catalog
    };
}

fn standard_weapons() -> Vec<Weapon> {
    use DamageType::*;
    use WeaponCategory::*;
    use WeaponProperty::*;

    vec![
        // Simple Melee Weapons
        Weapon::new("club", "Club", Simple)
            .with_one_handed("1d4", Bludgeoning)
            .with_properties([Light]),
        Weapon::new("dagger", "Dagger", Simple)
            .with_one_handed("1d4", Piercing)
            .with_properties([Finesse, Light, Thrown]),
        Weapon::new("greatclub", "Greatclub", Simple)
            .with_two_handed("1d8", Bludgeoning)
            .with_properties([TwoHanded]),
        Weapon::new("handaxe", "Handaxe", Simple)
            .with_one_handed("1d6", Slashing)
            .with_properties([Light, Thrown]),
        Weapon::new("javelin", "Javelin", Simple)
            .with_one_handed("1d6", Piercing)
            .with_properties([Thrown]),
        Weapon::new("light-hammer", "Light Hammer", Simple)
            .with_one_handed("1d4", Bludgeoning)
            .with_properties([Light, Thrown]),
        Weapon::new("mace", "Mace", Simple).with_one_handed("1d6", Bludgeoning),
        Weapon::new("quarterstaff", "Quarterstaff", Simple)
            .with_one_handed("1d6", Bludgeoning)
            .with_two_handed("1d8", Bludgeoning)
            .with_properties([Versatile]),
        Weapon::new("sickle", "Sickle", Simple)
            .with_one_handed("1d4", Slashing)
            .with_properties([Light]),
        Weapon::new("spear", "Spear", Simple)
            .with_one_handed("1d6", Piercing)
            .with_two_handed("1d8", Piercing)
            .with_properties([Thrown, Versatile]),
        // Martial Melee Weapons
        Weapon::new("battleaxe", "Battleaxe", Martial)
            .with_one_handed("1d8", Slashing)
            .with_two_handed("1d10", Slashing)
            .with_properties([Versatile]),
        Weapon::new("flail", "Flail", Martial).with_one_handed("1d8", Bludgeoning),
        Weapon::new("glaive", "Glaive", Martial)
            .with_two_handed("1d10", Slashing)
            .with_properties([Heavy, Reach, TwoHanded]),
        Weapon::new("greataxe", "Greataxe", Martial)
            .with_two_handed("1d12", Slashing)
            .with_properties([Heavy, TwoHanded]),
        Weapon::new("greatsword", "Greatsword", Martial)
            .with_two_handed("2d6", Slashing)
            .with_properties([Heavy, TwoHanded]),
        Weapon::new("longsword", "Longsword", Martial)
            .with_one_handed("1d8", Slashing)
            .with_two_handed("1d10", Slashing)
            .with_properties([Versatile]),
        Weapon::new("maul", "Maul", Martial)
            .with_two_handed("2d6", Bludgeoning)
            .with_properties([Heavy, TwoHanded]),
        Weapon::new("morningstar", "Morningstar", Martial).with_one_handed("1d8", Piercing),
        Weapon::new("rapier", "Rapier", Martial)
            .with_one_handed("1d8", Piercing)
            .with_properties([Finesse]),
        Weapon::new("scimitar", "Scimitar", Martial)
            .with_one_handed("1d6", Slashing)
            .with_properties([Finesse, Light]),
        Weapon::new("shortsword", "Shortsword", Martial)
            .with_one_handed("1d6", Piercing)
            .with_properties([Finesse, Light]),
        Weapon::new("war-pick", "War Pick", Martial).with_one_handed("1d8", Piercing),
        Weapon::new("warhammer", "Warhammer", Martial)
            .with_one_handed("1d8", Bludgeoning)
            .with_two_handed("1d10", Bludgeoning)
            .with_properties([Versatile]),
        Weapon::new("whip", "Whip", Martial)
            .with_one_handed("1d4", Slashing)
            .with_properties([Finesse, Reach]),
        // Simple Ranged Weapons
        Weapon::new("light-crossbow", "Light Crossbow", Simple)
            .ranged()
            .with_two_handed("1d8", Piercing)
            .with_properties([Ammunition, Loading, TwoHanded]),
        Weapon::new("shortbow", "Shortbow", Simple)
            .ranged()
            .with_two_handed("1d6", Piercing)
            .with_properties([Ammunition, TwoHanded]),
        // Martial Ranged Weapons
        Weapon::new("hand-crossbow", "Hand Crossbow", Martial)
            .ranged()
            .with_one_handed("1d6", Piercing)
            .with_properties([Ammunition, Light, Loading]),
        Weapon::new("heavy-crossbow", "Heavy Crossbow", Martial)
            .ranged()
            .with_two_handed("1d10", Piercing)
            .with_properties([Ammunition, Heavy, Loading, TwoHanded]),
        Weapon::new("longbow", "Longbow", Martial)
            .ranged()
            .with_two_handed("1d8", Piercing)
            .with_properties([Ammunition, Heavy, TwoHanded]),
    ]
}

fn standard_armor() -> Vec<Armor> {
    use ArmorCategory::*;

    vec![
        // Light Armor
        Armor::new("padded", "Padded Armor", Light, 11).with_stealth_disadvantage(),
        Armor::new("leather", "Leather Armor", Light, 11),
        Armor::new("studded-leather", "Studded Leather", Light, 12),
        // Medium Armor
        Armor::new("hide", "Hide Armor", Medium, 12),
        Armor::new("chain-shirt", "Chain Shirt", Medium, 13),
        Armor::new("scale-mail", "Scale Mail", Medium, 14).with_stealth_disadvantage(),
        Armor::new("breastplate", "Breastplate", Medium, 14),
        Armor::new("half-plate", "Half Plate", Medium, 15).with_stealth_disadvantage(),
        // Heavy Armor
        Armor::new("ring-mail", "Ring Mail", Heavy, 14).with_stealth_disadvantage(),
        Armor::new("chain-mail", "Chain Mail", Heavy, 16).with_stealth_disadvantage(),
        Armor::new("splint", "Splint Armor", Heavy, 17).with_stealth_disadvantage(),
        Armor::new("plate", "Plate Armor", Heavy, 18).with_stealth_disadvantage(),
        // Shields
        Armor::new("shield", "Shield", Shield, 2),
    ]
}

fn standard_skills() -> Vec<SkillEntry> {
    use Ability::*;

    [
        ("athletics", "Athletics", Strength),
        ("acrobatics", "Acrobatics", Dexterity),
        ("sleight-of-hand", "Sleight of Hand", Dexterity),
        ("stealth", "Stealth", Dexterity),
        ("arcana", "Arcana", Intelligence),
        ("history", "History", Intelligence),
        ("investigation", "Investigation", Intelligence),
        ("nature", "Nature", Intelligence),
        ("religion", "Religion", Intelligence),
        ("animal-handling", "Animal Handling", Wisdom),
        ("insight", "Insight", Wisdom),
        ("medicine", "Medicine", Wisdom),
        ("perception", "Perception", Wisdom),
        ("survival", "Survival", Wisdom),
        ("deception", "Deception", Charisma),
        ("intimidation", "Intimidation", Charisma),
        ("performance", "Performance", Charisma),
        ("persuasion", "Persuasion", Charisma),
    ]
    .into_iter()
    .map(|(index, name, ability)| SkillEntry::new(index, name, ability))
    .collect()
}
