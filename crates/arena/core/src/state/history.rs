//! Bounded ring of pre-command snapshots.

use std::collections::VecDeque;

use super::CombatState;
use crate::config::CombatConfig;

/// Deep copy of the state taken right before a command mutated it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// Turn number the command was issued in.
    pub turn: u32,
    pub state: CombatState,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnHistory {
    snapshots: VecDeque<Snapshot>,
    capacity: usize,
}

impl TurnHistory {
    /// Ring holding `capacity` snapshots, clamped to `1..=CombatConfig::HISTORY_LIMIT`.
    pub fn new(capacity: usize) -> Self {
        let capacity = CombatConfig::clamp_history(capacity);
        Self {
            snapshots: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records a snapshot, evicting the oldest once full.
    pub fn push(&mut self, state: CombatState) {
        while self.snapshots.len() >= self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(Snapshot {
            turn: state.turn.number,
            state,
        });
    }

    /// Index of the earliest retained snapshot taken during `turn`.
    pub fn position_of_turn(&self, turn: u32) -> Option<usize> {
        self.snapshots.iter().position(|s| s.turn == turn)
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// Keeps snapshots up to and including `index`.
    pub fn truncate_after(&mut self, index: usize) {
        self.snapshots.truncate(index + 1);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }

    /// Turn numbers a rollback can currently target.
    pub fn turns(&self) -> impl Iterator<Item = u32> + '_ {
        self.snapshots.iter().map(|s| s.turn)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

impl Default for TurnHistory {
    fn default() -> Self {
        Self::new(CombatConfig::HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_at(turn: u32) -> CombatState {
        let mut state = CombatState::default();
        state.turn.number = turn;
        state
    }

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let mut history = TurnHistory::new(3);
        for turn in 1..=5 {
            history.push(state_at(turn));
        }
        assert_eq!(history.turns().collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    fn capacity_stays_within_the_history_limit() {
        let mut history = TurnHistory::new(100);
        assert_eq!(history.capacity(), CombatConfig::HISTORY_LIMIT);
        for turn in 1..=50 {
            history.push(state_at(turn));
        }
        assert_eq!(history.len(), CombatConfig::HISTORY_LIMIT);
        assert_eq!(history.turns().next(), Some(31));

        let mut single = TurnHistory::new(0);
        single.push(state_at(1));
        assert_eq!(single.capacity(), 1);
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn finds_earliest_snapshot_of_a_turn() {
        let mut history = TurnHistory::new(10);
        for turn in [1, 2, 2, 3] {
            history.push(state_at(turn));
        }
        assert_eq!(history.position_of_turn(2), Some(1));
        assert_eq!(history.position_of_turn(4), None);

        history.truncate_after(1);
        assert_eq!(history.turns().collect::<Vec<_>>(), vec![1, 2]);
    }
}
