//! Error types for encounter operations.

use crate::config::ConfigError;
use crate::env::StatError;
use crate::error::{CombatError, ErrorSeverity};
use crate::resolver::ResolveError;
use crate::state::{EquipmentSlotError, ParticipantError, ParticipantId, TurnId};

/// Failure to admit a participant into an encounter.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AdmissionError {
    #[error("participant {0} is already in the encounter")]
    Duplicate(ParticipantId),

    #[error("encounter already holds {capacity} participants")]
    RosterFull { capacity: usize },

    #[error(transparent)]
    Stats(#[from] StatError),

    #[error(transparent)]
    Participant(#[from] ParticipantError),

    #[error("initial equipment rejected: {0}")]
    Equipment(#[from] EquipmentSlotError),
}

impl CombatError for AdmissionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Duplicate(_) => "ADMISSION_DUPLICATE",
            Self::RosterFull { .. } => "ADMISSION_ROSTER_FULL",
            Self::Stats(err) => err.error_code(),
            Self::Participant(err) => err.error_code(),
            Self::Equipment(err) => err.error_code(),
        }
    }
}

/// Errors raised while building an encounter. None of these ever reach the
/// scheduler.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CreateError {
    #[error("an encounter needs at least {min} participants, got {count}")]
    TooFewParticipants { count: usize, min: usize },

    #[error("an encounter holds at most {max} participants, got {count}")]
    TooManyParticipants { count: usize, max: usize },

    #[error("no stat provider configured")]
    MissingStatProvider,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Admission(#[from] AdmissionError),
}

impl CombatError for CreateError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TooFewParticipants { .. } => "CREATE_TOO_FEW_PARTICIPANTS",
            Self::TooManyParticipants { .. } => "CREATE_TOO_MANY_PARTICIPANTS",
            Self::MissingStatProvider => "CREATE_MISSING_STAT_PROVIDER",
            Self::Config(err) => err.error_code(),
            Self::Admission(err) => err.error_code(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StartError {
    #[error("encounter has already started")]
    AlreadyStarted,

    #[error("encounter has ended")]
    EncounterEnded,

    #[error("an encounter needs at least two active participants, got {active}")]
    TooFewParticipants { active: usize },

    #[error("termination condition already holds")]
    AlreadyDecided,
}

impl CombatError for StartError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AlreadyStarted => ErrorSeverity::Validation,
            Self::EncounterEnded | Self::TooFewParticipants { .. } | Self::AlreadyDecided => {
                ErrorSeverity::Fatal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyStarted => "START_ALREADY_STARTED",
            Self::EncounterEnded => "START_ENCOUNTER_ENDED",
            Self::TooFewParticipants { .. } => "START_TOO_FEW_PARTICIPANTS",
            Self::AlreadyDecided => "START_ALREADY_DECIDED",
        }
    }
}

/// Rejected submission. A rejection never consumes the turn: the decision
/// window stays open and a corrected request may still arrive in time.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SubmitError {
    #[error("target {target} is not an active participant")]
    InvalidTarget { target: ParticipantId },

    #[error("{participant} submitted out of turn; {active} is active")]
    OutOfTurn {
        participant: ParticipantId,
        active: ParticipantId,
    },

    #[error("submission from {participant} arrived after its turn closed")]
    StaleSubmission {
        participant: ParticipantId,
        turn: Option<TurnId>,
    },

    #[error(transparent)]
    EquipmentSlot(EquipmentSlotError),

    #[error("encounter has ended")]
    EncounterEnded,

    #[error("encounter has not started")]
    NotStarted,

    #[error("action rejected: {0}")]
    #[cfg_attr(feature = "serde", serde(skip))]
    Rejected(ResolveError),
}

impl From<ResolveError> for SubmitError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::InvalidTarget { target } => Self::InvalidTarget { target },
            ResolveError::Equipment(err) => Self::EquipmentSlot(err),
            other => Self::Rejected(other),
        }
    }
}

impl CombatError for SubmitError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidTarget { .. }
            | Self::OutOfTurn { .. }
            | Self::StaleSubmission { .. }
            | Self::EquipmentSlot(_) => ErrorSeverity::Validation,
            Self::NotStarted => ErrorSeverity::Recoverable,
            Self::EncounterEnded => ErrorSeverity::Fatal,
            Self::Rejected(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTarget { .. } => "SUBMIT_INVALID_TARGET",
            Self::OutOfTurn { .. } => "SUBMIT_OUT_OF_TURN",
            Self::StaleSubmission { .. } => "SUBMIT_STALE",
            Self::EquipmentSlot(err) => err.error_code(),
            Self::EncounterEnded => "SUBMIT_ENCOUNTER_ENDED",
            Self::NotStarted => "SUBMIT_NOT_STARTED",
            Self::Rejected(err) => err.error_code(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum JoinError {
    #[error("encounter has ended")]
    EncounterEnded,

    #[error(transparent)]
    Admission(#[from] AdmissionError),
}

impl CombatError for JoinError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::EncounterEnded => ErrorSeverity::Fatal,
            Self::Admission(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EncounterEnded => "JOIN_ENCOUNTER_ENDED",
            Self::Admission(err) => err.error_code(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LeaveError {
    #[error("encounter has ended")]
    EncounterEnded,

    #[error("participant {0} is not in the encounter")]
    UnknownParticipant(ParticipantId),
}

impl CombatError for LeaveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::EncounterEnded => ErrorSeverity::Fatal,
            Self::UnknownParticipant(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EncounterEnded => "LEAVE_ENCOUNTER_ENDED",
            Self::UnknownParticipant(_) => "LEAVE_UNKNOWN_PARTICIPANT",
        }
    }
}
