//! Commands accepted by the engine and the transitions that apply them.
//!
//! Each command is a small value type implementing [`CommandTransition`].
//! The engine drives every transition through the same three phases and
//! restores the pre-command state if any phase fails, so a rejected command
//! never leaves a partial mutation behind.

mod attack;
mod defend;
mod referee;
mod skip;
mod specials;
mod surrender;

pub use attack::{AttackCommand, AttackError, AttackResolution};
pub use defend::{DefendCommand, DefenseError};
pub use referee::{RefereeCommand, RefereeError};
pub use skip::{SkipCommand, SkipError};
pub use surrender::{SurrenderCommand, SurrenderError, SurrenderResponse};

use crate::env::CombatEnv;
use crate::state::{CombatState, FighterId};

/// Defines how a command mutates combat state.
///
/// Implementors can override the validation hooks to surface pre- and
/// post-conditions that must hold around the state mutation. All hooks receive
/// read-only access to the catalog, the dice and the tuning via `Env` and must
/// stay side-effect free.
pub trait CommandTransition {
    type Error;
    type Result;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(&self, _state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies the command. Implementations may assume `pre_validate` passed.
    fn apply(
        &self,
        state: &mut CombatState,
        env: &CombatEnv<'_>,
    ) -> Result<Self::Result, Self::Error>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(&self, _state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// How the actor wants to invoke a move.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Intent {
    #[default]
    Use,
    Charge,
    Toggle,
}

/// Every command the engine accepts, one variant per transition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    Attack(AttackCommand),
    Defend(DefendCommand),
    AttemptSurrender(SurrenderCommand),
    RespondToSurrender(SurrenderResponse),
    AdvanceSkippedTurn(SkipCommand),
    Referee(RefereeCommand),
}

impl Command {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Attack(_) => "attack",
            Self::Defend(_) => "defend",
            Self::AttemptSurrender(_) => "attempt_surrender",
            Self::RespondToSurrender(_) => "respond_to_surrender",
            Self::AdvanceSkippedTurn(_) => "advance_skipped_turn",
            Self::Referee(_) => "referee",
        }
    }

    /// Fighter issuing the command, when the command has one.
    pub fn actor(&self) -> Option<FighterId> {
        match self {
            Self::Attack(cmd) => Some(cmd.actor),
            Self::Defend(cmd) => Some(cmd.defender),
            Self::AttemptSurrender(cmd) => Some(cmd.actor),
            Self::RespondToSurrender(_) | Self::AdvanceSkippedTurn(_) | Self::Referee(_) => None,
        }
    }
}

impl From<AttackCommand> for Command {
    fn from(cmd: AttackCommand) -> Self {
        Self::Attack(cmd)
    }
}

impl From<DefendCommand> for Command {
    fn from(cmd: DefendCommand) -> Self {
        Self::Defend(cmd)
    }
}

impl From<SurrenderCommand> for Command {
    fn from(cmd: SurrenderCommand) -> Self {
        Self::AttemptSurrender(cmd)
    }
}

impl From<SurrenderResponse> for Command {
    fn from(cmd: SurrenderResponse) -> Self {
        Self::RespondToSurrender(cmd)
    }
}

impl From<SkipCommand> for Command {
    fn from(cmd: SkipCommand) -> Self {
        Self::AdvanceSkippedTurn(cmd)
    }
}

impl From<RefereeCommand> for Command {
    fn from(cmd: RefereeCommand) -> Self {
        Self::Referee(cmd)
    }
}

/// Command arrived in a phase that does not accept it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    #[error("the match is over")]
    GameOver,

    #[error("a defense is pending")]
    DefensePending,

    #[error("a surrender is pending")]
    SurrenderPending,

    #[error("{actor} is not the current actor ({current} is)")]
    NotCurrentActor {
        actor: FighterId,
        current: FighterId,
    },
}

impl SequenceError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::GameOver => "SEQUENCE_GAME_OVER",
            Self::DefensePending => "SEQUENCE_DEFENSE_PENDING",
            Self::SurrenderPending => "SEQUENCE_SURRENDER_PENDING",
            Self::NotCurrentActor { .. } => "SEQUENCE_NOT_CURRENT_ACTOR",
        }
    }
}

/// Checks that `actor` may start a new action now: match running, nothing pending, its turn.
pub(crate) fn ensure_actor_turn(state: &CombatState, actor: FighterId) -> Result<(), SequenceError> {
    ensure_idle(state)?;
    let current = state.current_actor();
    if actor != current {
        return Err(SequenceError::NotCurrentActor { actor, current });
    }
    Ok(())
}

/// Checks that the match is running and no defense or surrender is outstanding.
pub(crate) fn ensure_idle(state: &CombatState) -> Result<(), SequenceError> {
    if state.is_game_over() {
        return Err(SequenceError::GameOver);
    }
    match &state.pending {
        Some(crate::state::Pending::Defense(_)) => Err(SequenceError::DefensePending),
        Some(crate::state::Pending::Surrender(_)) => Err(SequenceError::SurrenderPending),
        None => Ok(()),
    }
}
