//! Rollback and reset: referee operations outside the command pipeline.

use crate::env::{CombatEnv, OracleError};
use crate::state::{LogEntry, LogKind, MatchOutcome, TurnState, first_actor};

use super::{CombatEngine, CommandResult, ExecutionOutcome, RollbackError};

impl CombatEngine<'_> {
    /// Restores the earliest retained snapshot taken during `target`.
    ///
    /// History up to and including that snapshot is kept. A pending defense
    /// or surrender on the current state is discarded with it.
    pub fn rollback_to(&mut self, target: u32) -> Result<ExecutionOutcome, RollbackError> {
        let current = self.battle.state.turn.number;
        if target == 0 {
            return Err(RollbackError::NonPositive);
        }
        if target >= current {
            return Err(RollbackError::NotInPast { target, current });
        }
        let index = self
            .battle
            .history
            .position_of_turn(target)
            .ok_or(RollbackError::NotRetained(target))?;
        let snapshot = self
            .battle
            .history
            .get(index)
            .cloned()
            .ok_or(RollbackError::NotRetained(target))?;

        self.battle.history.truncate_after(index);
        self.battle.state = snapshot.state;

        let log_start = self.battle.state.log.len();
        let entry = LogEntry::new(self.battle.state.turn.number, LogKind::Rollback)
            .with_note(format!("Rolled back from turn {current} to turn {target}"));
        self.battle.state.push_log(entry);

        Ok(ExecutionOutcome::collect(
            CommandResult::Rollback {
                from: current,
                to: target,
            },
            &self.battle.state,
            log_start,
        ))
    }

    /// Rebuilds every fighter from its configuration and starts over on turn 1.
    ///
    /// Log, history, pending records, bias and outcome are cleared. The match
    /// seed and nonce carry over so the new match draws fresh rolls.
    pub fn reset(&mut self, env: CombatEnv<'_>) -> Result<ExecutionOutcome, OracleError> {
        let catalog = env.moves()?;
        let state = &mut self.battle.state;

        state.roster.rebuild(catalog);
        state.log.clear();
        state.pending = None;
        state.damage_bias = 0;
        state.outcome = MatchOutcome::default();

        let rotation = first_actor(&state.roster);
        state.turn = TurnState::new(rotation.actor);
        state.turn.degenerate_rotation = rotation.degenerate;
        self.battle.history.clear();

        Ok(ExecutionOutcome::collect(
            CommandResult::Reset,
            &self.battle.state,
            0,
        ))
    }
}
