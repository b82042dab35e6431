//! Damage rolls and defender adjustments.
//!
//! Adjustments are applied per damage type in a fixed order:
//! - Immunity: 0 damage, regardless of anything else
//! - Resistance (without vulnerability): half damage, rounded down
//! - Vulnerability (without resistance): double damage
//! - Both resistance and vulnerability: they cancel, damage is unchanged

use crate::dice::{DiceSource, DiceSpec};
use crate::error::Result;
use crate::modifiers::Modifier;
use crate::world::Character;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Common D&D damage types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageType {
    Slashing,
    Piercing,
    Bludgeoning,
    Fire,
    Cold,
    Lightning,
    Thunder,
    Acid,
    Poison,
    Necrotic,
    Radiant,
    Force,
    Psychic,
}

impl DamageType {
    pub fn name(&self) -> &'static str {
        match self {
            DamageType::Slashing => "slashing",
            DamageType::Piercing => "piercing",
            DamageType::Bludgeoning => "bludgeoning",
            DamageType::Fire => "fire",
            DamageType::Cold => "cold",
            DamageType::Lightning => "lightning",
            DamageType::Thunder => "thunder",
            DamageType::Acid => "acid",
            DamageType::Poison => "poison",
            DamageType::Necrotic => "necrotic",
            DamageType::Radiant => "radiant",
            DamageType::Force => "force",
            DamageType::Psychic => "psychic",
        }
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DamageType {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "slashing" => Ok(DamageType::Slashing),
            "piercing" => Ok(DamageType::Piercing),
            "bludgeoning" => Ok(DamageType::Bludgeoning),
            "fire" => Ok(DamageType::Fire),
            "cold" => Ok(DamageType::Cold),
            "lightning" => Ok(DamageType::Lightning),
            "thunder" => Ok(DamageType::Thunder),
            "acid" => Ok(DamageType::Acid),
            "poison" => Ok(DamageType::Poison),
            "necrotic" => Ok(DamageType::Necrotic),
            "radiant" => Ok(DamageType::Radiant),
            "force" => Ok(DamageType::Force),
            "psychic" => Ok(DamageType::Psychic),
            _ => Err(()),
        }
    }
}

/// A damage profile: dice notation and damage type, e.g. `1d8` slashing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Damage {
    pub dice: String,
    #[serde(rename = "type")]
    pub damage_type: DamageType,
}

impl Damage {
    pub fn new(dice: impl Into<String>, damage_type: DamageType) -> Self {
        Self {
            dice: dice.into(),
            damage_type,
        }
    }
}

/// Which defender trait changed the rolled damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageAdjustment {
    Immunity,
    Resistance,
    Vulnerability,
}

/// One resolved damage entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageResult {
    pub dice: String,
    #[serde(rename = "type")]
    pub damage_type: DamageType,
    pub rolled: i32,
    #[serde(rename = "final")]
    pub final_damage: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<DamageAdjustment>,
}

/// All damage from one hit: base profile, riders and flat bonuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRollResult {
    pub base: DamageResult,
    pub extras: Vec<DamageResult>,
    pub modifiers: Vec<Modifier>,
    pub total: i32,
}

impl DamageRollResult {
    /// Sum the entries. Flat bonuses can't drive the total below zero.
    pub fn new(base: DamageResult, extras: Vec<DamageResult>, modifiers: Vec<Modifier>) -> Self {
        let total = base.final_damage
            + extras.iter().map(|d| d.final_damage).sum::<i32>()
            + Modifier::sum(&modifiers);
        Self {
            base,
            extras,
            modifiers,
            total: total.max(0),
        }
    }
}

/// Apply the defender's immunity/resistance/vulnerability to a rolled amount.
pub fn adjust_damage(
    defender: &Character,
    damage_type: DamageType,
    rolled: i32,
) -> (i32, Option<DamageAdjustment>) {
    if defender.immunities.contains(&damage_type) {
        return (0, Some(DamageAdjustment::Immunity));
    }

    let resistant = defender.resistances.contains(&damage_type);
    let vulnerable = defender.vulnerabilities.contains(&damage_type);

    match (resistant, vulnerable) {
        (true, false) => (rolled.div_euclid(2), Some(DamageAdjustment::Resistance)),
        (false, true) => (rolled * 2, Some(DamageAdjustment::Vulnerability)),
        // Neither, or both cancelling out.
        _ => (rolled, None),
    }
}

/// Roll one damage profile against a defender.
pub fn damage_roll<D: DiceSource + ?Sized>(
    dice: &mut D,
    defender: &Character,
    damage: &Damage,
    critical: bool,
) -> Result<DamageResult> {
    let spec = DiceSpec::parse(&damage.dice)?;
    let rolled = spec.roll_with(dice, critical);
    let (final_damage, adjustment) = adjust_damage(defender, damage.damage_type, rolled);

    tracing::debug!(
        dice = %damage.dice,
        damage_type = %damage.damage_type,
        critical,
        rolled,
        final_damage,
        ?adjustment,
        "damage resolved"
    );

    Ok(DamageResult {
        dice: damage.dice.clone(),
        damage_type: damage.damage_type,
        rolled,
        final_damage,
        adjustment,
    })
}
