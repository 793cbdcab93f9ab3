//! Command dispatch and the three-phase transition driver.

use crate::command::{Command, CommandTransition};
use crate::env::CombatEnv;
use crate::state::CombatState;

use super::CommandResult;
use super::errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

/// Executes a transition through the three-phase pipeline and returns the result.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the combat state and return result
/// 3. `post_validate` - Verify postconditions after mutation
#[inline]
fn drive_transition<T>(
    transition: &T,
    state: &mut CombatState,
    env: &CombatEnv<'_>,
) -> Result<T::Result, TransitionPhaseError<T::Error>>
where
    T: CommandTransition,
{
    transition
        .pre_validate(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    let result = transition
        .apply(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))?;

    Ok(result)
}

/// Routes each command to its transition. The caller owns rollback on error.
pub(super) fn execute_command(
    command: &Command,
    state: &mut CombatState,
    env: &CombatEnv<'_>,
) -> Result<CommandResult, ExecuteError> {
    match command {
        Command::Attack(cmd) => drive_transition(cmd, state, env)
            .map(CommandResult::Attack)
            .map_err(ExecuteError::Attack),
        Command::Defend(cmd) => drive_transition(cmd, state, env)
            .map(|landed| CommandResult::Defense { landed })
            .map_err(ExecuteError::Defense),
        Command::AttemptSurrender(cmd) => drive_transition(cmd, state, env)
            .map(|()| CommandResult::SurrenderAttempted)
            .map_err(ExecuteError::Surrender),
        Command::RespondToSurrender(cmd) => drive_transition(cmd, state, env)
            .map(CommandResult::SurrenderResolved)
            .map_err(ExecuteError::Surrender),
        Command::AdvanceSkippedTurn(cmd) => drive_transition(cmd, state, env)
            .map(CommandResult::Skipped)
            .map_err(ExecuteError::SkippedTurn),
        Command::Referee(cmd) => drive_transition(cmd, state, env)
            .map(|()| CommandResult::Referee)
            .map_err(ExecuteError::Referee),
    }
}
