//! Common error infrastructure for arena-core.
//!
//! Command-specific errors (`AttackError`, `DefenseError`, ...) live next to the
//! commands they validate. This module holds what they share: severity levels
//! and the taxonomy bucket a caller can branch on.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the command may succeed later (e.g. once a pending defense resolves)
/// - **Validation**: malformed input that will never succeed unchanged
/// - **Internal**: state inconsistency that indicates a bug
/// - **Fatal**: the engine cannot continue (missing oracle)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Caller-facing classification of a rejected command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Command arrived in the wrong phase (attack while a defense is pending, ...).
    InvalidCommandSequence,
    /// Rollback target outside the retained window.
    InvalidRollbackTarget,
    /// Command names a slot with no combatant behind it.
    UnknownCombatantReference,
    /// Move exists but the actor cannot use it right now.
    UnavailableMove,
    /// Move catalog or oracle problem.
    Catalog,
}

/// Common trait for all arena-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - `error_code` values are stable and used by the runtime logs
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    fn kind(&self) -> ErrorKind;

    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
