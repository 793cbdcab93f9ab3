//! Auto-skip interception and the explicit advance-past-skipped-turn command.

use super::{CommandTransition, SequenceError, ensure_idle};
use crate::env::CombatEnv;
use crate::error::{CombatError, ErrorKind, ErrorSeverity};
use crate::state::{CombatState, Fighter, FighterId, LogEntry, LogKind, SkipReason};

/// Why `fighter` cannot act this turn, if it cannot.
pub(crate) fn skip_reason(fighter: &Fighter) -> Option<SkipReason> {
    if fighter.is_defeated() {
        Some(SkipReason::Defeated)
    } else if fighter.auto_skip {
        Some(SkipReason::AutoSkip)
    } else if fighter.is_stunned() {
        Some(SkipReason::Stunned)
    } else {
        None
    }
}

/// Passes the current actor's turn: logs the reason, counts down stun, rotates.
pub(crate) fn intercept(state: &mut CombatState, actor: FighterId, reason: SkipReason) {
    let turn = state.turn.number;
    let mut entries = Vec::with_capacity(2);

    if let Some(fighter) = state.fighter_mut(actor) {
        let mut entry = LogEntry::about(turn, LogKind::AutoSkip, fighter);
        entry.skip_reason = Some(reason);
        entries.push(entry);

        if fighter.is_stunned() && !fighter.is_defeated() {
            fighter.status.stun.turns_remaining -= 1;
            if !fighter.is_stunned() {
                entries.push(
                    LogEntry::about(turn, LogKind::StunRecovered, fighter)
                        .with_note(format!("{} has recovered from being stunned", fighter.name)),
                );
            }
        }
    }

    for entry in entries {
        state.push_log(entry);
    }
    state.pass_turn();
}

/// Advances past a skip-eligible current actor without submitting a move.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkipCommand;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SkipError {
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error("current actor {0} has no backing record")]
    UnknownActor(FighterId),

    #[error("{0} can act and cannot be skipped")]
    NotSkipEligible(FighterId),
}

impl CombatError for SkipError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Sequence(_) => ErrorSeverity::Recoverable,
            Self::UnknownActor(_) => ErrorSeverity::Internal,
            Self::NotSkipEligible(_) => ErrorSeverity::Validation,
        }
    }

    fn kind(&self) -> ErrorKind {
        match self {
            Self::Sequence(_) | Self::NotSkipEligible(_) => ErrorKind::InvalidCommandSequence,
            Self::UnknownActor(_) => ErrorKind::UnknownCombatantReference,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Sequence(inner) => inner.error_code(),
            Self::UnknownActor(_) => "SKIP_UNKNOWN_ACTOR",
            Self::NotSkipEligible(_) => "SKIP_NOT_ELIGIBLE",
        }
    }
}

impl CommandTransition for SkipCommand {
    type Error = SkipError;
    type Result = SkipReason;

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        ensure_idle(state)?;
        let actor = state.current_actor();
        let fighter = state.fighter(actor).ok_or(SkipError::UnknownActor(actor))?;
        skip_reason(fighter)
            .map(|_| ())
            .ok_or(SkipError::NotSkipEligible(actor))
    }

    fn apply(
        &self,
        state: &mut CombatState,
        _env: &CombatEnv<'_>,
    ) -> Result<Self::Result, Self::Error> {
        let actor = state.current_actor();
        let reason = state
            .fighter(actor)
            .and_then(skip_reason)
            .ok_or(SkipError::NotSkipEligible(actor))?;
        intercept(state, actor, reason);
        Ok(reason)
    }
}
