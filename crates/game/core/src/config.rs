//! Encounter configuration constants and tunable parameters.

use std::time::Duration;

use crate::error::{CombatError, ErrorSeverity};

/// Action applied on a participant's behalf when its decision window elapses.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TimeoutAction {
    #[default]
    Defend,
    Pass,
    Disengage,
}

/// Which termination policy an encounter uses.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TerminationKind {
    /// Ends when fewer than two participants remain active.
    #[default]
    LastStanding,
    /// Ends when the active participants all belong to one side.
    OpposingSides,
}

/// Encounter rules. Percentages are whole numbers in `0..=100`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncounterConfig {
    /// Length of each decision window.
    pub turn_duration_secs: u64,
    /// How long before the deadline a warning is raised. Zero disables it.
    pub turn_warning_secs: u64,
    pub default_action_on_timeout: TimeoutAction,
    pub min_hit_chance: u32,
    pub max_hit_chance: u32,
    /// Rolls at or under this (and under the hit chance) are critical.
    pub critical_chance: u32,
    pub flee_success_chance: u32,
    /// Hit chance subtracted from the next attack against a defender.
    pub defend_bonus: i32,
    /// Initiative is `1..=initiative_die` plus the participant's modifier.
    pub initiative_die: u32,
    pub equipment_enabled: bool,
    pub termination: TerminationKind,
    /// End the encounter once every active participant has disengaged.
    pub end_on_mutual_disengage: bool,
    /// Seed for every random draw of the encounter.
    pub seed: u64,
}

impl EncounterConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_PARTICIPANTS: usize = 64;
    pub const MAX_INVENTORY_SLOTS: usize = 8;
    pub const MIN_PARTICIPANTS: usize = 2;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TURN_DURATION_SECS: u64 = 30;
    pub const DEFAULT_TURN_WARNING_SECS: u64 = 10;
    pub const DEFAULT_MIN_HIT_CHANCE: u32 = 10;
    pub const DEFAULT_MAX_HIT_CHANCE: u32 = 95;
    pub const DEFAULT_CRITICAL_CHANCE: u32 = 5;
    pub const DEFAULT_FLEE_SUCCESS_CHANCE: u32 = 50;
    pub const DEFAULT_DEFEND_BONUS: i32 = 20;
    pub const DEFAULT_INITIATIVE_DIE: u32 = 20;

    // ===== upper bounds accepted by `validate` =====
    /// One day.
    pub const MAX_TURN_DURATION_SECS: u64 = 24 * 60 * 60;
    pub const MAX_INITIATIVE_DIE: u32 = 1_000;

    pub fn new() -> Self {
        Self {
            turn_duration_secs: Self::DEFAULT_TURN_DURATION_SECS,
            turn_warning_secs: Self::DEFAULT_TURN_WARNING_SECS,
            default_action_on_timeout: TimeoutAction::default(),
            min_hit_chance: Self::DEFAULT_MIN_HIT_CHANCE,
            max_hit_chance: Self::DEFAULT_MAX_HIT_CHANCE,
            critical_chance: Self::DEFAULT_CRITICAL_CHANCE,
            flee_success_chance: Self::DEFAULT_FLEE_SUCCESS_CHANCE,
            defend_bonus: Self::DEFAULT_DEFEND_BONUS,
            initiative_die: Self::DEFAULT_INITIATIVE_DIE,
            equipment_enabled: true,
            termination: TerminationKind::default(),
            end_on_mutual_disengage: true,
            seed: 0,
        }
    }

    pub fn turn_duration(&self) -> Duration {
        Duration::from_secs(self.turn_duration_secs)
    }

    /// Offset from window opening at which the timeout warning fires.
    pub fn warning_offset(&self) -> Option<Duration> {
        if self.turn_warning_secs == 0 || self.turn_warning_secs >= self.turn_duration_secs {
            return None;
        }
        Some(Duration::from_secs(
            self.turn_duration_secs - self.turn_warning_secs,
        ))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_equipment(mut self, enabled: bool) -> Self {
        self.equipment_enabled = enabled;
        self
    }

    pub fn with_timeout_action(mut self, action: TimeoutAction) -> Self {
        self.default_action_on_timeout = action;
        self
    }

    pub fn with_flee_chance(mut self, chance: u32) -> Self {
        self.flee_success_chance = chance;
        self
    }

    pub fn with_hit_band(mut self, min: u32, max: u32) -> Self {
        self.min_hit_chance = min;
        self.max_hit_chance = max;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.turn_duration_secs == 0 {
            return Err(ConfigError::ZeroTurnDuration);
        }
        if self.turn_duration_secs > Self::MAX_TURN_DURATION_SECS {
            return Err(ConfigError::TurnDurationTooLong {
                secs: self.turn_duration_secs,
                max: Self::MAX_TURN_DURATION_SECS,
            });
        }
        if self.initiative_die == 0 {
            return Err(ConfigError::ZeroInitiativeDie);
        }
        if self.initiative_die > Self::MAX_INITIATIVE_DIE {
            return Err(ConfigError::InitiativeDieTooLarge {
                sides: self.initiative_die,
                max: Self::MAX_INITIATIVE_DIE,
            });
        }
        if self.min_hit_chance > self.max_hit_chance {
            return Err(ConfigError::InvertedHitBand {
                min: self.min_hit_chance,
                max: self.max_hit_chance,
            });
        }
        for (name, value) in [
            ("max_hit_chance", self.max_hit_chance),
            ("critical_chance", self.critical_chance),
            ("flee_success_chance", self.flee_success_chance),
        ] {
            if value > 100 {
                return Err(ConfigError::PercentOutOfRange { name, value });
            }
        }
        Ok(())
    }
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("turn duration must be positive")]
    ZeroTurnDuration,

    #[error("turn duration of {secs}s exceeds the maximum of {max}s")]
    TurnDurationTooLong { secs: u64, max: u64 },

    #[error("initiative die must have at least one side")]
    ZeroInitiativeDie,

    #[error("initiative die of {sides} sides exceeds the maximum of {max}")]
    InitiativeDieTooLarge { sides: u32, max: u32 },

    #[error("hit chance band is inverted: min {min} > max {max}")]
    InvertedHitBand { min: u32, max: u32 },

    #[error("{name} must be a percentage, got {value}")]
    PercentOutOfRange { name: &'static str, value: u32 },
}

impl CombatError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroTurnDuration => "CONFIG_ZERO_TURN_DURATION",
            Self::TurnDurationTooLong { .. } => "CONFIG_TURN_DURATION_TOO_LONG",
            Self::ZeroInitiativeDie => "CONFIG_ZERO_INITIATIVE_DIE",
            Self::InitiativeDieTooLarge { .. } => "CONFIG_INITIATIVE_DIE_TOO_LARGE",
            Self::InvertedHitBand { .. } => "CONFIG_INVERTED_HIT_BAND",
            Self::PercentOutOfRange { .. } => "CONFIG_PERCENT_OUT_OF_RANGE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EncounterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.turn_duration(), Duration::from_secs(30));
        assert_eq!(config.warning_offset(), Some(Duration::from_secs(20)));
    }

    #[test]
    fn rejects_inverted_band() {
        let config = EncounterConfig::default().with_hit_band(90, 20);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedHitBand { min: 90, max: 20 })
        );
    }

    #[test]
    fn rejects_percent_over_hundred() {
        let config = EncounterConfig::default().with_flee_chance(150);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PercentOutOfRange {
                name: "flee_success_chance",
                ..
            })
        ));
    }

    #[test]
    fn rejects_unbounded_turn_duration() {
        let mut config = EncounterConfig::default();
        config.turn_duration_secs = u64::MAX;
        assert_eq!(
            config.validate(),
            Err(ConfigError::TurnDurationTooLong {
                secs: u64::MAX,
                max: EncounterConfig::MAX_TURN_DURATION_SECS,
            })
        );

        config.turn_duration_secs = EncounterConfig::MAX_TURN_DURATION_SECS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_oversized_initiative_die() {
        let mut config = EncounterConfig::default();
        config.initiative_die = u32::MAX;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InitiativeDieTooLarge { sides: u32::MAX, .. })
        ));

        config.initiative_die = EncounterConfig::MAX_INITIATIVE_DIE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn warning_disabled_when_not_shorter_than_window() {
        let mut config = EncounterConfig::default();
        config.turn_warning_secs = 30;
        assert_eq!(config.warning_offset(), None);
        config.turn_warning_secs = 0;
        assert_eq!(config.warning_offset(), None);
    }

    #[test]
    fn timeout_action_parses() {
        assert_eq!("PASS".parse::<TimeoutAction>().unwrap(), TimeoutAction::Pass);
        assert_eq!(TimeoutAction::Disengage.to_string(), "disengage");
    }
}
