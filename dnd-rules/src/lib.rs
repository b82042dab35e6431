//! D&D 5e combat and check resolution.
//!
//! This crate provides:
//! - Dice notation parsing and rolling against a swappable random source
//! - The d20 protocol with advantage, disadvantage and natural 1s and 20s
//! - Modifier aggregation, armor class and damage adjustment
//! - Main-hand, off-hand and ranged attacks against a read-only catalog
//!
//! # Quick Start
//!
//! ```
//! use dnd_rules::testing::{sample_fighter, sample_rogue};
//! use dnd_rules::{dice, AttackOptions, Catalog, RulesEngine};
//!
//! let engine = RulesEngine::new(Catalog::standard());
//! let fighter = sample_fighter("Gorm");
//! let rogue = sample_rogue("Vex");
//!
//! let mut rng = dice::seeded(7);
//! let result = engine
//!     .main_hand_attack(&mut rng, &AttackOptions::new(&fighter, &rogue))
//!     .unwrap();
//! assert_eq!(result.is_hit(), result.damage_roll.is_some());
//! ```

pub mod armor;
pub mod check;
pub mod config;
pub mod damage;
pub mod dice;
pub mod error;
pub mod items;
pub mod modifiers;
pub mod rules;
pub mod testing;
pub mod world;

// Primary public API
pub use armor::ArmorClassResult;
pub use check::{roll20, D20Check, RollOutcome};
pub use config::RulesConfig;
pub use damage::{Damage, DamageAdjustment, DamageResult, DamageRollResult, DamageType};
pub use dice::{Advantage, DiceError, DiceSource, DiceSpec};
pub use error::{Result, RulesError};
pub use items::{Armor, ArmorCategory, Catalog, EquipmentItem, SkillEntry, Weapon, WeaponProperty};
pub use modifiers::Modifier;
pub use rules::{AttackHand, AttackOptions, AttackResult, RulesEngine};
pub use world::{Ability, AbilityScores, Character, Equipment, EquipmentSlot};
