//! Unified error types surfaced by the runtime API.
//!
//! Wraps engine rejections, content failures, save/restore problems and
//! observer failures so clients can bubble them up with consistent context.
use thiserror::Error;

use arena_core::{
    CombatError, ExecuteError, MoveId, OracleError, RollbackError, RosterError,
};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Execute(#[from] ExecuteError),

    #[error(transparent)]
    Rollback(#[from] RollbackError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Content(#[from] anyhow::Error),

    #[error("session requires a move catalog before building")]
    MissingCatalog,

    #[error("session requires a roster before building")]
    MissingRoster,

    #[error("observer '{name}' failed: {message}")]
    ObserverFailed { name: &'static str, message: String },

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error(transparent)]
    Script(#[from] ScriptError),
}

impl RuntimeError {
    /// Stable code for logs; engine errors keep their own codes.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Execute(e) => e.error_code(),
            Self::Rollback(e) => e.error_code(),
            Self::Oracle(e) => e.error_code(),
            Self::Roster(_) => "RUNTIME_ROSTER",
            Self::Content(_) => "RUNTIME_CONTENT",
            Self::MissingCatalog => "RUNTIME_MISSING_CATALOG",
            Self::MissingRoster => "RUNTIME_MISSING_ROSTER",
            Self::ObserverFailed { .. } => "RUNTIME_OBSERVER_FAILED",
            Self::Save(_) => "RUNTIME_SAVE",
            Self::Script(_) => "RUNTIME_SCRIPT",
        }
    }
}

/// Errors raised while encoding or decoding a saved battle.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("save blob too short ({0} bytes)")]
    Truncated(usize),

    #[error("not an arena save (bad magic)")]
    BadMagic,

    #[error("unsupported save version {found}, expected {expected}")]
    VersionMismatch { found: u16, expected: u16 },

    #[error("digest mismatch: expected {expected}, computed {computed}")]
    DigestMismatch { expected: String, computed: String },

    #[error("saved fighter {fighter} owns move {move_id} missing from the catalog")]
    UnknownMove { fighter: String, move_id: MoveId },
}

/// Errors raised while loading or resolving a scripted bout.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse script RON: {0}")]
    Parse(String),

    #[error("step {step}: unknown move '{name}'")]
    UnknownMove { step: usize, name: String },

    #[error("step {step}: fighter {fighter} is outside the roster (slots start at 1)")]
    UnknownFighter { step: usize, fighter: u8 },
}
