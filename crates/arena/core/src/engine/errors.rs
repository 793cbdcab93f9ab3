//! Error types for the command pipeline and rollback.

use crate::command::{AttackError, DefenseError, RefereeError, SkipError, SurrenderError};
use crate::error::{CombatError, ErrorKind, ErrorSeverity};

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

/// Errors surfaced while executing a command through the engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    #[error("attack rejected: {0}")]
    Attack(TransitionPhaseError<AttackError>),

    #[error("defense rejected: {0}")]
    Defense(TransitionPhaseError<DefenseError>),

    #[error("surrender rejected: {0}")]
    Surrender(TransitionPhaseError<SurrenderError>),

    #[error("skip rejected: {0}")]
    SkippedTurn(TransitionPhaseError<SkipError>),

    #[error("referee override rejected: {0}")]
    Referee(TransitionPhaseError<RefereeError>),
}

impl ExecuteError {
    pub fn phase(&self) -> TransitionPhase {
        match self {
            Self::Attack(e) => e.phase,
            Self::Defense(e) => e.phase,
            Self::Surrender(e) => e.phase,
            Self::SkippedTurn(e) => e.phase,
            Self::Referee(e) => e.phase,
        }
    }

    fn inner(&self) -> &dyn CombatError {
        match self {
            Self::Attack(e) => &e.error,
            Self::Defense(e) => &e.error,
            Self::Surrender(e) => &e.error,
            Self::SkippedTurn(e) => &e.error,
            Self::Referee(e) => &e.error,
        }
    }
}

impl CombatError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        self.inner().severity()
    }

    fn kind(&self) -> ErrorKind {
        self.inner().kind()
    }

    fn error_code(&self) -> &'static str {
        self.inner().error_code()
    }
}

/// Rollback target outside the retained window.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RollbackError {
    #[error("rollback target must be a positive turn number")]
    NonPositive,

    #[error("turn {target} is not in the past (current turn is {current})")]
    NotInPast { target: u32, current: u32 },

    #[error("turn {0} is no longer retained in history")]
    NotRetained(u32),
}

impl CombatError for RollbackError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidRollbackTarget
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositive => "ROLLBACK_NON_POSITIVE",
            Self::NotInPast { .. } => "ROLLBACK_NOT_IN_PAST",
            Self::NotRetained(_) => "ROLLBACK_NOT_RETAINED",
        }
    }
}
