//! Unified error types surfaced by the runtime API.
//!
//! Wraps encounter rejections and worker coordination failures so clients can
//! bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use skirmish_core::{
    CombatError, CreateError, EncounterId, ErrorSeverity, JoinError, LeaveError, StartError,
    SubmitError,
};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("encounter worker command channel closed")]
    CommandChannelClosed,

    #[error("encounter worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("encounter worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("unknown encounter {0}")]
    UnknownEncounter(EncounterId),

    #[error("environment variable {key} has invalid value {value:?}")]
    InvalidEnv { key: &'static str, value: String },

    #[error(transparent)]
    Create(#[from] CreateError),

    #[error(transparent)]
    Start(#[from] StartError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error(transparent)]
    Join(#[from] JoinError),

    #[error(transparent)]
    Leave(#[from] LeaveError),
}

impl RuntimeError {
    /// The underlying encounter error, when the failure came from the core.
    pub fn combat_error(&self) -> Option<&dyn CombatError> {
        match self {
            Self::Create(err) => Some(err),
            Self::Start(err) => Some(err),
            Self::Submit(err) => Some(err),
            Self::Join(err) => Some(err),
            Self::Leave(err) => Some(err),
            _ => None,
        }
    }

    /// Severity of the failure. Channel and task failures are internal.
    pub fn severity(&self) -> ErrorSeverity {
        match self.combat_error() {
            Some(err) => err.severity(),
            None => match self {
                Self::UnknownEncounter(_) | Self::InvalidEnv { .. } => ErrorSeverity::Validation,
                _ => ErrorSeverity::Internal,
            },
        }
    }
}
