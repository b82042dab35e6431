//! Armor class from equipped body armor and shield.

use crate::config::RulesConfig;
use crate::error::{Result, RulesError};
use crate::items::{Armor, ArmorCategory, Catalog, EquipmentItem};
use crate::modifiers::Modifier;
use crate::world::{Ability, Character, EquipmentSlot};
use serde::{Deserialize, Serialize};

/// A computed armor class and everything that went into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorClassResult {
    pub base: i32,
    pub total: i32,
    pub modifiers: Vec<Modifier>,
}

impl ArmorClassResult {
    fn new(base: i32, modifiers: Vec<Modifier>) -> Self {
        Self {
            base,
            total: base + Modifier::sum(&modifiers),
            modifiers,
        }
    }
}

/// The armor worn in the body slot, if any.
///
/// Fails if the slot names an unknown item, a non-armor item, or a shield.
pub fn body_armor<'c>(character: &Character, catalog: &'c Catalog) -> Result<Option<&'c Armor>> {
    let Some(id) = character.equipment.get(EquipmentSlot::Body) else {
        return Ok(None);
    };
    let armor = catalog.armor(id)?;
    if armor.is_shield() {
        return Err(RulesError::WrongCategory {
            id: id.to_string(),
            expected: "body armor",
        });
    }
    Ok(Some(armor))
}

/// The shield held in the off hand, if any. A weapon there is not an error.
pub fn shield<'c>(character: &Character, catalog: &'c Catalog) -> Result<Option<&'c Armor>> {
    let Some(id) = character.equipment.get(EquipmentSlot::OffHand) else {
        return Ok(None);
    };
    match catalog.get(id) {
        Some(EquipmentItem::Armor(armor)) if armor.is_shield() => Ok(Some(armor)),
        Some(_) => Ok(None),
        None => Err(RulesError::not_found("equipment", id)),
    }
}

/// Compute a character's armor class from what they have equipped.
pub fn armor_class(
    character: &Character,
    catalog: &Catalog,
    config: &RulesConfig,
) -> Result<ArmorClassResult> {
    let mut modifiers = Vec::new();

    let base = match body_armor(character, catalog)? {
        None => config.unarmored_base_ac,
        Some(armor) => {
            let dex = Modifier::ability(character, Ability::Dexterity)?;
            match armor.armor_category {
                ArmorCategory::Light => modifiers.extend(dex),
                ArmorCategory::Medium => {
                    if let Some(mut dex) = dex {
                        dex.value = dex.value.min(config.medium_armor_dex_cap);
                        if dex.value != 0 {
                            modifiers.push(dex);
                        }
                    }
                }
                ArmorCategory::Heavy | ArmorCategory::Shield => {}
            }
            if let Some(bonus) = armor.enchantment.filter(|b| *b != 0) {
                modifiers.push(Modifier::new("armor_enchantment", bonus).with_index(&armor.index));
            }
            armor.armor_class
        }
    };

    if let Some(shield) = shield(character, catalog)? {
        if shield.armor_class != 0 {
            modifiers
                .push(Modifier::new("shield_bonus", shield.armor_class).with_index(&shield.index));
        }
        if let Some(bonus) = shield.enchantment.filter(|b| *b != 0) {
            modifiers.push(Modifier::new("shield_enchantment", bonus).with_index(&shield.index));
        }
    }

    let result = ArmorClassResult::new(base, modifiers);
    tracing::debug!(
        character = %character.name,
        base = result.base,
        total = result.total,
        "armor class computed"
    );
    Ok(result)
}
