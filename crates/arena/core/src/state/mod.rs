//! Authoritative combat state.
//!
//! The state is a plain value: the engine clones it into the history ring
//! before every command and restores clones on rollback. Nothing here holds
//! references to the catalog or the dice.
mod fighter;
mod history;
mod log;
mod pending;
mod roster;
mod status;
mod turn;

pub use fighter::{AiProfile, Fighter, FighterConfig, FighterId, Race};
pub use history::{Snapshot, TurnHistory};
pub use log::{
    BlockResult, CombatLog, LogEntry, LogKind, OutcomeFlags, SkipReason, SurrenderResult,
    ToggleChange,
};
pub use pending::{Pending, PendingDefense, PendingSurrender};
pub use roster::{Roster, RosterError};
pub use status::{ActiveToggle, Channeling, ChargedMove, FighterStatus, StunStatus, ToggleSet};
pub use turn::{EndReason, MatchOutcome, Rotation, TurnState, first_actor, next_actor};

use crate::env::{RollContext, compute_seed};

/// Canonical snapshot of a match.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatState {
    /// Match seed, fixed at creation. Combined with `nonce` for every roll.
    pub seed: u64,
    /// Count of accepted commands.
    pub nonce: u64,
    pub turn: TurnState,
    pub roster: Roster,
    pub pending: Option<Pending>,
    /// Referee damage adjustment in percent, consumed by the next attack.
    pub damage_bias: i32,
    pub outcome: MatchOutcome,
    pub log: CombatLog,
}

impl CombatState {
    /// Starts a match on turn 1 with the first eligible fighter to act.
    pub fn new(seed: u64, roster: Roster) -> Self {
        let rotation = first_actor(&roster);
        let mut turn = TurnState::new(rotation.actor);
        turn.degenerate_rotation = rotation.degenerate;
        Self {
            seed,
            nonce: 0,
            turn,
            roster,
            pending: None,
            damage_bias: 0,
            outcome: MatchOutcome::default(),
            log: CombatLog::default(),
        }
    }

    pub fn fighter(&self, id: FighterId) -> Option<&Fighter> {
        self.roster.get(id)
    }

    pub fn fighter_mut(&mut self, id: FighterId) -> Option<&mut Fighter> {
        self.roster.get_mut(id)
    }

    pub fn current_actor(&self) -> FighterId {
        self.turn.current
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome.game_over
    }

    pub fn pending_defense(&self) -> Option<&PendingDefense> {
        self.pending.as_ref().and_then(Pending::as_defense)
    }

    pub fn pending_surrender(&self) -> Option<&PendingSurrender> {
        self.pending.as_ref().and_then(Pending::as_surrender)
    }

    /// Seed for one roll made on behalf of `actor` during the current command.
    pub fn roll_seed(&self, actor: FighterId, context: RollContext) -> u64 {
        compute_seed(self.seed, self.nonce, actor.0, context)
    }

    /// Increments the turn counter and hands the turn to the next eligible fighter.
    pub fn advance_turn(&mut self) {
        self.advance_from(self.turn.current);
    }

    /// Like [`advance_turn`](Self::advance_turn) but rotates from an explicit slot.
    pub fn advance_from(&mut self, from: FighterId) {
        let rotation = next_actor(&self.roster, from);
        self.turn.number += 1;
        self.turn.current = rotation.actor;
        self.turn.degenerate_rotation = rotation.degenerate;
    }

    /// Ends the current actor's turn, spending a pending extra move if there is one.
    pub fn finish_turn(&mut self) {
        if self.turn.extra_moves > 0 {
            self.turn.extra_moves -= 1;
        } else {
            self.advance_turn();
        }
    }

    /// Ends the turn without spending it as an action; any extra move is forfeited.
    pub fn pass_turn(&mut self) {
        self.turn.extra_moves = 0;
        self.advance_turn();
    }

    /// Global cooldown tick: every fighter, every move.
    pub fn tick_cooldowns(&mut self) {
        for fighter in self.roster.iter_mut() {
            fighter.cooldowns.retain(|_, remaining| {
                *remaining = remaining.saturating_sub(1);
                *remaining > 0
            });
        }
    }

    /// Ends the match once at most one fighter is left in the rotation.
    pub fn refresh_outcome(&mut self) {
        if self.outcome.game_over {
            return;
        }
        let mut active = self.roster.active();
        let first = active.next().map(|f| f.id);
        if active.next().is_none() {
            self.outcome = MatchOutcome::finished(first, EndReason::LastFighterStanding);
        }
    }

    pub fn push_log(&mut self, entry: LogEntry) {
        self.log.push(entry);
    }
}

/// State plus the rollback history that belongs to it.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Battle {
    pub state: CombatState,
    pub history: TurnHistory,
}

impl Battle {
    pub fn new(state: CombatState, history_capacity: usize) -> Self {
        Self {
            state,
            history: TurnHistory::new(history_capacity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{MoveId, StaticMoveCatalog};

    fn state(fighters: usize) -> CombatState {
        let configs =
            (0..fighters).map(|i| FighterConfig::new(format!("F{}", i + 1), Race::Human, 1000));
        let roster = Roster::build(configs, &StaticMoveCatalog::default()).expect("roster");
        CombatState::new(7, roster)
    }

    #[test]
    fn extra_move_keeps_the_turn_once() {
        let mut state = state(3);
        state.turn.extra_moves = 1;

        state.finish_turn();
        assert_eq!(state.turn.number, 1);
        assert_eq!(state.current_actor(), FighterId(0));

        state.finish_turn();
        assert_eq!(state.turn.number, 2);
        assert_eq!(state.current_actor(), FighterId(1));
    }

    #[test]
    fn pass_turn_forfeits_extra_move() {
        let mut state = state(2);
        state.turn.extra_moves = 1;
        state.pass_turn();
        assert_eq!(state.turn.extra_moves, 0);
        assert_eq!(state.current_actor(), FighterId(1));
    }

    #[test]
    fn cooldowns_tick_down_and_expire() {
        let mut state = state(2);
        if let Some(f) = state.fighter_mut(FighterId(1)) {
            f.cooldowns.insert(MoveId(3), 2);
            f.cooldowns.insert(MoveId(4), 1);
        }
        state.tick_cooldowns();
        let fighter = state.fighter(FighterId(1)).expect("fighter");
        assert_eq!(fighter.cooldown(MoveId(3)), 1);
        assert!(!fighter.cooldowns.contains_key(&MoveId(4)));
    }

    #[test]
    fn match_ends_with_one_fighter_left() {
        let mut state = state(2);
        state.refresh_outcome();
        assert!(!state.is_game_over());

        if let Some(f) = state.fighter_mut(FighterId(1)) {
            f.power = 0;
        }
        state.refresh_outcome();
        assert_eq!(
            state.outcome,
            MatchOutcome::finished(Some(FighterId(0)), EndReason::LastFighterStanding)
        );
    }
}
