//! The d20 resolution protocol shared by attacks, ability checks, skill
//! checks and saving throws.

use crate::dice::{Advantage, DiceSource};
use crate::modifiers::Modifier;
use serde::{Deserialize, Serialize};

/// A d20 check to resolve: bonuses, the number to meet, and the roll mode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct D20Check {
    pub modifiers: Vec<Modifier>,
    pub target: i32,
    #[serde(default)]
    pub advantage: Advantage,
}

impl D20Check {
    pub fn new(target: i32) -> Self {
        Self {
            modifiers: Vec::new(),
            target,
            advantage: Advantage::Normal,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Vec<Modifier>) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_advantage(mut self, advantage: Advantage) -> Self {
        self.advantage = advantage;
        self
    }
}

/// The result of a d20 check.
///
/// On a natural 1 or 20 the roll is `critical` and `total`/`modifiers` are
/// left out: the outcome never looked at them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    /// `[r1]` in normal mode, `[r1, r2]` otherwise.
    pub rolls: Vec<u32>,
    pub picked: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<Vec<Modifier>>,
    pub success: bool,
    #[serde(default)]
    pub critical: bool,
    pub target: i32,
    #[serde(default)]
    pub advantage: Advantage,
}

impl RollOutcome {
    pub fn is_natural_20(&self) -> bool {
        self.picked == 20
    }

    pub fn is_natural_1(&self) -> bool {
        self.picked == 1
    }

    /// A critical that came up 20. This is what doubles attack damage.
    pub fn is_critical_hit(&self) -> bool {
        self.critical && self.is_natural_20()
    }
}

/// Resolve a d20 check.
///
/// Two d20s are always drawn, even in normal mode, so that the number of
/// values consumed from `dice` doesn't depend on the mode.
pub fn roll20<D: DiceSource + ?Sized>(dice: &mut D, check: &D20Check) -> RollOutcome {
    let r1 = dice.roll_die(20);
    let r2 = dice.roll_die(20);

    let (rolls, picked) = match check.advantage {
        Advantage::Normal => (vec![r1], r1),
        Advantage::Advantage => (vec![r1, r2], r1.max(r2)),
        Advantage::Disadvantage => (vec![r1, r2], r1.min(r2)),
    };

    let outcome = if picked == 20 || picked == 1 {
        RollOutcome {
            rolls,
            picked,
            total: None,
            modifiers: None,
            success: picked == 20,
            critical: true,
            target: check.target,
            advantage: check.advantage,
        }
    } else {
        let total = picked as i32 + Modifier::sum(&check.modifiers);
        RollOutcome {
            rolls,
            picked,
            total: Some(total),
            modifiers: Some(check.modifiers.clone()),
            success: total >= check.target,
            critical: false,
            target: check.target,
            advantage: check.advantage,
        }
    };

    tracing::debug!(
        rolls = ?outcome.rolls,
        picked,
        total = ?outcome.total,
        target = check.target,
        success = outcome.success,
        critical = outcome.critical,
        "d20 resolved"
    );

    outcome
}
