//! Tunable rules parameters.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Configuration for a [`crate::rules::RulesEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Armor class with no body armor equipped.
    pub unarmored_base_ac: i32,

    /// Highest dexterity bonus medium armor allows. Penalties are never capped.
    pub medium_armor_dex_cap: i32,

    /// Add the ability modifier to off-hand damage, as for the main hand.
    pub off_hand_ability_damage: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            unarmored_base_ac: 10,
            medium_armor_dex_cap: 2,
            off_hand_ability_damage: false,
        }
    }
}

impl RulesConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the unarmored base armor class.
    pub fn with_unarmored_base_ac(mut self, ac: i32) -> Self {
        self.unarmored_base_ac = ac;
        self
    }

    /// Set the medium armor dexterity cap.
    pub fn with_medium_armor_dex_cap(mut self, cap: i32) -> Self {
        self.medium_armor_dex_cap = cap;
        self
    }

    /// Let off-hand attacks add the ability modifier to damage.
    pub fn with_off_hand_ability_damage(mut self, enabled: bool) -> Self {
        self.off_hand_ability_damage = enabled;
        self
    }
}
