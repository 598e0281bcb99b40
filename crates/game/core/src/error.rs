//! Common error infrastructure for skirmish-core.
//!
//! This module provides shared types and traits used across all error types in
//! the crate. Operation-specific errors (e.g. `SubmitError`, `ResolveError`) are
//! defined next to the operations that produce them.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each operation has its own error type with specific variants
//! - **Structured**: Errors are values returned to the caller, never panics
//! - **Severity Classification**: Errors are categorized for recovery strategies

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: The caller may retry with a corrected request
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected state inconsistencies that require investigation
/// - **Fatal**: The operation can never succeed for this encounter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Retry with a different request may succeed.
    ///
    /// Examples: submitting out of turn, targeting a defeated participant
    Recoverable,

    /// Invalid input, should not retry without changes.
    ///
    /// Examples: unknown item, incompatible equipment slot
    Validation,

    /// Unexpected state inconsistency. These indicate bugs.
    Internal,

    /// The encounter cannot accept this operation at all.
    ///
    /// Examples: creating an encounter with fewer than two participants,
    /// submitting after the encounter ended
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all skirmish-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for categorization, metrics, and testing. Defaults to the type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
