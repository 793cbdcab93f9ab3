//! Context handed to observers.

use arena_core::{Command, CombatState, ExecutionOutcome};

/// Read-only view of one accepted command.
pub struct ObserverContext<'a> {
    /// The submitted command; `None` for rollback and reset.
    pub command: Option<&'a Command>,

    pub outcome: &'a ExecutionOutcome,

    /// State after the command.
    pub state: &'a CombatState,

    /// This command is the one that ended the match.
    pub match_ended: bool,
}
