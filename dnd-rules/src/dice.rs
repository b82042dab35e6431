//! D&D dice rolling system.
//!
//! Supports single-term dice notation: `[count]d[sides][+/-modifier]`,
//! e.g. `2d6+3`, `d20`, `1d8-1`. Randomness comes from a [`DiceSource`],
//! so callers can swap in a seeded or scripted source for tests.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for dice parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("Invalid dice notation: {0}")]
    InvalidNotation(String),
}

/// Advantage state for d20 rolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Advantage {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

impl Advantage {
    /// Combine two advantage states (advantage + disadvantage = normal).
    pub fn combine(self, other: Advantage) -> Advantage {
        match (self, other) {
            (Advantage::Normal, x) | (x, Advantage::Normal) => x,
            (Advantage::Advantage, Advantage::Disadvantage) => Advantage::Normal,
            (Advantage::Disadvantage, Advantage::Advantage) => Advantage::Normal,
            (Advantage::Advantage, Advantage::Advantage) => Advantage::Advantage,
            (Advantage::Disadvantage, Advantage::Disadvantage) => Advantage::Disadvantage,
        }
    }
}

/// Source of die values.
///
/// Every random draw in the crate goes through this trait. Any [`RngCore`]
/// is a source; [`crate::testing::ScriptedDice`] replays fixed values.
pub trait DiceSource {
    /// Draw one value uniformly from `1..=sides`.
    fn roll_die(&mut self, sides: u32) -> u32;
}

impl<R: RngCore> DiceSource for R {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.gen_range(1..=sides)
    }
}

/// A deterministic source seeded from `seed`.
pub fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Most dice a single notation may roll.
pub const MAX_DICE: u32 = 1000;

/// A parsed dice expression (e.g., 2d6+3).
///
/// Only [`DiceSpec::parse`] builds one, so count and sides are always at
/// least 1 and even a critical roll fits in an `i32`. It serializes as its
/// notation string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceSpec {
    count: u32,
    sides: u32,
    modifier: i32,
}

impl DiceSpec {
    /// Parse a dice notation string.
    ///
    /// Case-insensitive; surrounding whitespace is trimmed. The count is
    /// optional and defaults to 1. At most one signed modifier is allowed.
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let invalid = || {
            tracing::debug!(notation, "rejected dice notation");
            DiceError::InvalidNotation(notation.to_string())
        };

        let normalized = notation.trim().to_lowercase();
        let (count_str, rest) = normalized.split_once('d').ok_or_else(invalid)?;

        let count: u32 = if count_str.is_empty() {
            1
        } else {
            parse_digits(count_str).ok_or_else(invalid)?
        };

        let (sides_str, modifier) = match rest.find(['+', '-']) {
            Some(pos) => {
                let (sides, signed) = rest.split_at(pos);
                let magnitude: i32 = parse_digits(&signed[1..]).ok_or_else(invalid)?;
                let modifier = if signed.starts_with('-') {
                    -magnitude
                } else {
                    magnitude
                };
                (sides, modifier)
            }
            None => (rest, 0),
        };

        let sides: u32 = parse_digits(sides_str).ok_or_else(invalid)?;

        if count == 0 || sides == 0 || count > MAX_DICE {
            return Err(invalid());
        }
        let critical_max = i64::from(count) * 2 * i64::from(sides) + i64::from(modifier);
        let critical_min = i64::from(count) * 2 + i64::from(modifier);
        if i32::try_from(critical_max).is_err() || i32::try_from(critical_min).is_err() {
            return Err(invalid());
        }

        Ok(DiceSpec {
            count,
            sides,
            modifier,
        })
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    pub fn modifier(&self) -> i32 {
        self.modifier
    }

    /// Number of dice drawn, doubled for a critical.
    pub fn dice_drawn(&self, critical: bool) -> u32 {
        if critical {
            self.count * 2
        } else {
            self.count
        }
    }

    /// Roll with a specific source. A critical doubles the dice, not the modifier.
    pub fn roll_with<D: DiceSource + ?Sized>(&self, source: &mut D, critical: bool) -> i32 {
        let dice_total: i64 = (0..self.dice_drawn(critical))
            .map(|_| i64::from(source.roll_die(self.sides)))
            .sum();
        saturate(dice_total + i64::from(self.modifier))
    }

    /// Lowest possible result of a non-critical roll.
    pub fn min(&self) -> i32 {
        saturate(i64::from(self.count) + i64::from(self.modifier))
    }

    /// Highest possible result of a non-critical roll.
    pub fn max(&self) -> i32 {
        saturate(i64::from(self.count) * i64::from(self.sides) + i64::from(self.modifier))
    }
}

/// Clamp an `i64` total into `i32`. A source can return values above `sides`.
fn saturate(total: i64) -> i32 {
    i32::try_from(total).unwrap_or(if total < 0 { i32::MIN } else { i32::MAX })
}

impl TryFrom<String> for DiceSpec {
    type Error = DiceError;

    fn try_from(notation: String) -> Result<Self, Self::Error> {
        DiceSpec::parse(&notation)
    }
}

impl From<DiceSpec> for String {
    fn from(spec: DiceSpec) -> Self {
        spec.to_string()
    }
}

/// Parses a non-empty run of ASCII digits.
fn parse_digits<T: FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl FromStr for DiceSpec {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiceSpec::parse(s)
    }
}

impl fmt::Display for DiceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "{m}"),
        }
    }
}

/// Convenience function to roll dice from a notation string.
pub fn roll(notation: &str, critical: bool) -> Result<i32, DiceError> {
    roll_with(&mut rand::thread_rng(), notation, critical)
}

/// Roll with a specific source (useful for testing).
pub fn roll_with<D: DiceSource + ?Sized>(
    source: &mut D,
    notation: &str,
    critical: bool,
) -> Result<i32, DiceError> {
    let spec = DiceSpec::parse(notation)?;
    Ok(spec.roll_with(source, critical))
}
