//! Surrender handshake: attempt, then accept or decline.

use super::specials::set_cooldown;
use super::{CommandTransition, SequenceError, ensure_actor_turn};
use crate::env::{CombatEnv, MoveDefinition};
use crate::error::{CombatError, ErrorKind, ErrorSeverity};
use crate::state::{
    CombatState, EndReason, FighterId, LogEntry, LogKind, Pending, PendingSurrender,
    SurrenderResult, next_actor,
};

/// `actor` offers to surrender; the next eligible fighter answers.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurrenderCommand {
    pub actor: FighterId,
}

impl SurrenderCommand {
    pub fn new(actor: FighterId) -> Self {
        Self { actor }
    }
}

/// Answer to the outstanding surrender.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurrenderResponse {
    pub accept: bool,
}

impl SurrenderResponse {
    pub fn accept() -> Self {
        Self { accept: true }
    }

    pub fn decline() -> Self {
        Self { accept: false }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SurrenderError {
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error("fighter slot {0} has no backing record")]
    UnknownActor(FighterId),

    #[error("no surrender is pending")]
    NothingPending,
}

impl CombatError for SurrenderError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Sequence(_) | Self::NothingPending => ErrorSeverity::Recoverable,
            Self::UnknownActor(_) => ErrorSeverity::Validation,
        }
    }

    fn kind(&self) -> ErrorKind {
        match self {
            Self::Sequence(_) | Self::NothingPending => ErrorKind::InvalidCommandSequence,
            Self::UnknownActor(_) => ErrorKind::UnknownCombatantReference,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Sequence(inner) => inner.error_code(),
            Self::UnknownActor(_) => "SURRENDER_UNKNOWN_ACTOR",
            Self::NothingPending => "SURRENDER_NOTHING_PENDING",
        }
    }
}

/// Logs the attempt, parks it and hands the turn to the responder without advancing the counter.
pub(super) fn attempt(state: &mut CombatState, actor: FighterId, def: Option<&MoveDefinition>) {
    let turn = state.turn.number;
    let rotation = next_actor(&state.roster, actor);

    let responder = state.fighter(rotation.actor).map(|f| (f.id, f.name.clone()));
    if let Some(fighter) = state.fighter_mut(actor) {
        let mut entry = LogEntry::about(turn, LogKind::SurrenderAttempt, fighter);
        if let Some(def) = def {
            set_cooldown(fighter, def);
            entry = entry.with_move(def);
        }
        if let Some((id, name)) = responder {
            entry.target = Some(id);
            entry.target_name = name;
        }
        entry.surrender = Some(SurrenderResult::Attempted);
        state.push_log(entry);
    }

    state.pending = Some(Pending::Surrender(PendingSurrender { surrenderer: actor }));
    state.turn.extra_moves = 0;
    state.turn.current = rotation.actor;
    state.turn.degenerate_rotation = rotation.degenerate;
}

impl CommandTransition for SurrenderCommand {
    type Error = SurrenderError;
    type Result = ();

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        if !state.roster.contains(self.actor) {
            return Err(SurrenderError::UnknownActor(self.actor));
        }
        ensure_actor_turn(state, self.actor)?;
        Ok(())
    }

    fn apply(&self, state: &mut CombatState, env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        // the actor's own surrender move, if it has one, carries the cooldown
        let def = match (env.moves(), state.fighter(self.actor)) {
            (Ok(moves), Some(fighter)) => fighter
                .moves
                .iter()
                .filter_map(|&id| moves.definition(id))
                .find(|def| def.is_surrender()),
            _ => None,
        };
        attempt(state, self.actor, def);
        Ok(())
    }
}

impl CommandTransition for SurrenderResponse {
    type Error = SurrenderError;
    type Result = SurrenderResult;

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        state
            .pending_surrender()
            .map(|_| ())
            .ok_or(SurrenderError::NothingPending)
    }

    fn apply(
        &self,
        state: &mut CombatState,
        _env: &CombatEnv<'_>,
    ) -> Result<Self::Result, Self::Error> {
        let surrenderer = state
            .pending_surrender()
            .map(|pending| pending.surrenderer)
            .ok_or(SurrenderError::NothingPending)?;
        let turn = state.turn.number;
        let responder = state
            .fighter(state.current_actor())
            .map(|f| (f.id, f.name.clone()));
        let result = if self.accept {
            SurrenderResult::Accepted
        } else {
            SurrenderResult::Declined
        };

        if let Some(fighter) = state.fighter_mut(surrenderer) {
            if self.accept {
                fighter.auto_skip = true;
            }
            let mut entry = LogEntry::about(turn, LogKind::SurrenderResolved, fighter);
            if let Some((id, name)) = responder {
                entry.target = Some(id);
                entry.target_name = name;
            }
            entry.surrender = Some(result);
            state.push_log(entry);
        }

        if self.accept {
            state.refresh_outcome();
            if state.outcome.game_over && state.outcome.reason == Some(EndReason::LastFighterStanding)
            {
                state.outcome.reason = Some(EndReason::SurrenderAccepted);
            }
        } else {
            state.turn.current = surrenderer;
        }
        state.pending = None;
        state.turn.number += 1;
        Ok(result)
    }
}
