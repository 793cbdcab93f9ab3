//! Observers notified after every accepted command.
//!
//! Observers see the outcome of a command (new log entries, warnings) and the
//! state it produced. They cannot mutate the battle; anything they want to do
//! with the information happens on their side.
//!
//! # Execution Order
//!
//! Observers are sorted by priority (lower values run first). A failure is
//! handled according to the observer's [`ObserverCriticality`]; the command
//! that triggered the notification stays applied either way.

mod context;
mod registry;
mod transcript;

pub use context::ObserverContext;
pub use registry::ObserverRegistry;
pub use transcript::TranscriptObserver;

/// Failure reported by an observer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ObserverError(pub String);

impl ObserverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Defines how an observer failure is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverCriticality {
    /// Failure is returned to the caller of the session method.
    Critical,

    /// Failure is logged as an error and the remaining observers still run.
    Important,

    /// Failure is logged at debug level.
    Optional,
}

pub trait CombatObserver: Send + Sync {
    /// Returns a human-readable name for this observer (used in logging).
    fn name(&self) -> &'static str;

    /// Lower values run first.
    fn priority(&self) -> i32 {
        0
    }

    fn criticality(&self) -> ObserverCriticality {
        ObserverCriticality::Important
    }

    /// Filters notifications. Defaults to every accepted command.
    fn should_notify(&self, _ctx: &ObserverContext<'_>) -> bool {
        true
    }

    fn notify(&self, ctx: &ObserverContext<'_>) -> Result<(), ObserverError>;
}
