//! Turn bookkeeping, match outcome and the rotation scheduler.

use super::{FighterId, Roster};
use crate::config::CombatConfig;

/// Whose turn it is and how the rotation behaved last time it advanced.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// 1-based turn counter.
    pub number: u32,
    pub current: FighterId,
    /// One-shot extra turn for the current actor (0 or 1).
    pub extra_moves: u8,
    /// Set when the last rotation found nobody eligible.
    pub degenerate_rotation: bool,
}

impl TurnState {
    pub fn new(current: FighterId) -> Self {
        Self {
            number: 1,
            current,
            extra_moves: 0,
            degenerate_rotation: false,
        }
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new(FighterId(0))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EndReason {
    #[strum(to_string = "last fighter standing")]
    LastFighterStanding,
    #[strum(to_string = "surrender accepted")]
    SurrenderAccepted,
    #[strum(to_string = "transformation backlash")]
    TransformationBacklash,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchOutcome {
    pub game_over: bool,
    pub winner: Option<FighterId>,
    pub reason: Option<EndReason>,
}

impl MatchOutcome {
    pub fn finished(winner: Option<FighterId>, reason: EndReason) -> Self {
        Self {
            game_over: true,
            winner,
            reason: Some(reason),
        }
    }
}

/// Result of one scheduler pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rotation {
    pub actor: FighterId,
    /// No eligible fighter was found; `actor` is a best-effort pick.
    pub degenerate: bool,
}

/// Picks the next eligible fighter after `current`, cycling the fixed rotation once.
///
/// Empty slots, auto-skip fighters and defeated fighters are passed over.
/// Stunned fighters are not: their stun is consumed by the skip interception.
pub fn next_actor(roster: &Roster, current: FighterId) -> Rotation {
    let slots = CombatConfig::MAX_COMBATANTS;
    let candidates = (1..=slots).map(|step| FighterId(((current.slot() + step) % slots) as u8));

    let mut fallback = None;
    for candidate in candidates {
        let Some(fighter) = roster.get(candidate) else {
            continue;
        };
        if fighter.is_active() {
            return Rotation {
                actor: candidate,
                degenerate: false,
            };
        }
        fallback.get_or_insert(candidate);
    }

    Rotation {
        actor: fallback.unwrap_or(current),
        degenerate: true,
    }
}

/// First eligible slot from the top of the rotation, used on match start and reset.
pub fn first_actor(roster: &Roster) -> Rotation {
    let last = FighterId((CombatConfig::MAX_COMBATANTS - 1) as u8);
    next_actor(roster, last)
}
