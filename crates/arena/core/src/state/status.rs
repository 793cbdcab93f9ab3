//! Status effects: active toggles, charge, stun and channeling.

use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::env::{MoveDefinition, MoveGrant, MoveId};

/// One activated toggle. Armor toggles carry their own durability pool.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveToggle {
    pub move_id: MoveId,
    pub durability: Option<u64>,
    pub max_durability: Option<u64>,
    /// Granted-move counters owned by this activation.
    pub grants: ArrayVec<MoveGrant, { CombatConfig::MAX_GRANTS_PER_TOGGLE }>,
}

impl ActiveToggle {
    /// Fresh activation: full durability, full grant counters.
    pub fn activate(def: &MoveDefinition) -> Self {
        let durability = def.armor().map(|armor| armor.durability);
        Self {
            move_id: def.id,
            durability,
            max_durability: durability,
            grants: def.grants().iter().copied().take(CombatConfig::MAX_GRANTS_PER_TOGGLE).collect(),
        }
    }
}

/// Ordered set of active toggles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ToggleSet {
    toggles: ArrayVec<ActiveToggle, { CombatConfig::MAX_ACTIVE_TOGGLES }>,
}

impl ToggleSet {
    pub fn contains(&self, move_id: MoveId) -> bool {
        self.toggles.iter().any(|t| t.move_id == move_id)
    }

    pub fn get(&self, move_id: MoveId) -> Option<&ActiveToggle> {
        self.toggles.iter().find(|t| t.move_id == move_id)
    }

    pub fn get_mut(&mut self, move_id: MoveId) -> Option<&mut ActiveToggle> {
        self.toggles.iter_mut().find(|t| t.move_id == move_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveToggle> {
        self.toggles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ActiveToggle> {
        self.toggles.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.toggles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toggles.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.toggles.is_full()
    }

    /// Returns false when the set is full.
    pub fn insert(&mut self, toggle: ActiveToggle) -> bool {
        self.toggles.try_push(toggle).is_ok()
    }

    pub fn remove(&mut self, move_id: MoveId) -> Option<ActiveToggle> {
        let index = self.toggles.iter().position(|t| t.move_id == move_id)?;
        Some(self.toggles.remove(index))
    }

    /// Drops armor toggles whose durability hit zero; returns their ids.
    pub fn remove_broken(&mut self) -> Vec<MoveId> {
        let broken: Vec<MoveId> = self
            .toggles
            .iter()
            .filter(|t| t.durability == Some(0))
            .map(|t| t.move_id)
            .collect();
        self.toggles.retain(|t| t.durability != Some(0));
        broken
    }

    /// Uses left on `move_id` across every active grant.
    pub fn granted_uses(&self, move_id: MoveId) -> u32 {
        self.toggles
            .iter()
            .flat_map(|t| t.grants.iter())
            .filter(|g| g.move_id == move_id)
            .map(|g| g.uses)
            .sum()
    }

    /// Decrements the first grant of `move_id` with uses left.
    pub fn consume_grant(&mut self, move_id: MoveId) -> bool {
        let grant = self
            .toggles
            .iter_mut()
            .flat_map(|t| t.grants.iter_mut())
            .find(|g| g.move_id == move_id && g.uses > 0);
        match grant {
            Some(grant) => {
                grant.uses -= 1;
                true
            }
            None => false,
        }
    }
}

/// Accumulated charge on a single move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChargedMove {
    pub move_id: MoveId,
    pub level: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StunStatus {
    pub turns_remaining: u32,
}

impl StunStatus {
    pub fn is_stunned(&self) -> bool {
        self.turns_remaining > 0
    }
}

/// Temporary full-power window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Channeling {
    pub initial: u64,
    pub boosted: u64,
    pub after_effect: u64,
    pub attacks_remaining: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FighterStatus {
    pub toggles: ToggleSet,
    pub charge: Option<ChargedMove>,
    pub stun: StunStatus,
    pub channeling: Option<Channeling>,
}
