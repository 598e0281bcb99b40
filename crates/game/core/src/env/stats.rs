//! Inbound accessor for participant stats.
//!
//! The host owns character sheets. The engine reads a participant's stat
//! block once when the participant joins, and again whenever its equipment
//! changes. It never polls.

use crate::error::{CombatError, ErrorSeverity};
use crate::state::{HitPoints, ParticipantId};

/// Supplies combat-relevant attributes of external actors.
pub trait StatProvider: Send + Sync {
    fn combat_stats(&self, participant: ParticipantId) -> Result<StatBlock, StatError>;
}

/// Combat attributes as reported by the host, without equipment modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBlock {
    pub hit_points: HitPoints,
    pub accuracy: i32,
    pub defense: i32,
    pub damage_min: u32,
    pub damage_max: u32,
    pub initiative_mod: i32,
}

impl StatBlock {
    /// Checks the block is internally consistent.
    pub fn validate(&self, participant: ParticipantId) -> Result<(), StatError> {
        if self.damage_min > self.damage_max {
            return Err(StatError::Inconsistent {
                participant,
                reason: "damage_min exceeds damage_max",
            });
        }
        if self.hit_points.current > self.hit_points.max {
            return Err(StatError::Inconsistent {
                participant,
                reason: "current hit points exceed maximum",
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StatError {
    #[error("no stats available for participant {0}")]
    Unknown(ParticipantId),

    #[error("stats for participant {participant} are inconsistent: {reason}")]
    Inconsistent {
        participant: ParticipantId,
        reason: &'static str,
    },
}

impl CombatError for StatError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Unknown(_) => "STAT_UNKNOWN",
            Self::Inconsistent { .. } => "STAT_INCONSISTENT",
        }
    }
}
