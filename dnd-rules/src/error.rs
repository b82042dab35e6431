//! Error types for rules resolution.

use crate::dice::DiceError;
use thiserror::Error;

/// Errors raised while resolving checks, armor class, attacks and damage.
///
/// None of these are recovered from inside the crate; they surface to the
/// immediate caller.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error(transparent)]
    Dice(#[from] DiceError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("{id} is not {expected}")]
    WrongCategory { id: String, expected: &'static str },

    #[error("Off-hand attacks require a light weapon: {0}")]
    InvalidOffhand(String),

    #[error("Damage profile not found: {0}")]
    MissingDamageProfile(String),

    #[error("Invalid score: {0}")]
    InvalidScore(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl RulesError {
    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        RulesError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RulesError>;
