//! Command execution, rollback and reset.
//!
//! The [`CombatEngine`] is the authoritative reducer for a [`Battle`]. Every
//! command runs through the same pipeline: clone the pre-state, drive the
//! transition phases, then either restore the clone (rejected) or record it in
//! the history ring and bump the nonce (accepted).

mod errors;
mod history;
mod transition;

pub use errors::{ExecuteError, RollbackError, TransitionPhase, TransitionPhaseError};

use core::fmt;

use crate::command::{AttackResolution, Command};
use crate::env::CombatEnv;
use crate::state::{Battle, CombatState, FighterId, LogEntry, Rotation, SkipReason, SurrenderResult, TurnHistory, next_actor};

/// What an accepted command did, beyond its log entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandResult {
    Attack(AttackResolution),
    /// Damage that actually came off the defender's power.
    Defense { landed: u64 },
    SurrenderAttempted,
    SurrenderResolved(SurrenderResult),
    Skipped(SkipReason),
    Referee,
    Rollback { from: u32, to: u32 },
    Reset,
}

/// Non-fatal conditions callers should surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineWarning {
    /// Nobody in the rotation can act; `actor` is a best-effort pick.
    DegenerateRotation { turn: u32, actor: FighterId },
}

impl fmt::Display for EngineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateRotation { turn, actor } => write!(
                f,
                "turn {turn}: no eligible fighter in the rotation, falling back to {actor}"
            ),
        }
    }
}

/// Complete outcome of one accepted command.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecutionOutcome {
    pub result: CommandResult,
    /// Log entries appended by the command, in order.
    pub entries: Vec<LogEntry>,
    pub warnings: Vec<EngineWarning>,
}

impl ExecutionOutcome {
    fn collect(result: CommandResult, state: &CombatState, log_start: usize) -> Self {
        let mut warnings = Vec::new();
        if state.turn.degenerate_rotation {
            warnings.push(EngineWarning::DegenerateRotation {
                turn: state.turn.number,
                actor: state.turn.current,
            });
        }
        Self {
            result,
            entries: state.log.since(log_start).to_vec(),
            warnings,
        }
    }
}

/// Combat engine that validates and applies commands against a battle.
pub struct CombatEngine<'a> {
    battle: &'a mut Battle,
}

impl<'a> CombatEngine<'a> {
    pub fn new(battle: &'a mut Battle) -> Self {
        Self { battle }
    }

    pub fn state(&self) -> &CombatState {
        &self.battle.state
    }

    pub fn history(&self) -> &TurnHistory {
        &self.battle.history
    }

    pub fn current_actor(&self) -> FighterId {
        self.battle.state.current_actor()
    }

    /// Who would act after the current actor if the turn ended now.
    pub fn peek_next_actor(&self) -> Rotation {
        next_actor(&self.battle.state.roster, self.battle.state.current_actor())
    }

    /// Executes a command atomically.
    ///
    /// On success the pre-command state is pushed into history and the nonce
    /// increments. On error the state is restored to exactly what it was.
    pub fn execute(
        &mut self,
        env: CombatEnv<'_>,
        command: &Command,
    ) -> Result<ExecutionOutcome, ExecuteError> {
        let before = self.battle.state.clone();
        let log_start = before.log.len();

        match transition::execute_command(command, &mut self.battle.state, &env) {
            Ok(result) => {
                self.battle.state.nonce += 1;
                self.battle.history.push(before);
                Ok(ExecutionOutcome::collect(
                    result,
                    &self.battle.state,
                    log_start,
                ))
            }
            Err(error) => {
                self.battle.state = before;
                Err(error)
            }
        }
    }
}
