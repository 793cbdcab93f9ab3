//! Transient records awaiting a second command.

use super::FighterId;
use crate::env::MoveId;

/// Contested attack awaiting the defender's response.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingDefense {
    pub attacker: FighterId,
    pub defender: FighterId,
    pub move_id: MoveId,
    /// Damage before defense and armor.
    pub damage: u64,
    pub critical: bool,
    /// Already deducted from the attacker; carried for the log.
    pub self_damage: u64,
    pub extra_move: bool,
    /// Charge level consumed by this use, if any.
    pub charge_level: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingSurrender {
    pub surrenderer: FighterId,
}

/// At most one record of either kind is outstanding.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pending {
    Defense(PendingDefense),
    Surrender(PendingSurrender),
}

impl Pending {
    pub fn as_defense(&self) -> Option<&PendingDefense> {
        match self {
            Self::Defense(pending) => Some(pending),
            Self::Surrender(_) => None,
        }
    }

    pub fn as_surrender(&self) -> Option<&PendingSurrender> {
        match self {
            Self::Surrender(pending) => Some(pending),
            Self::Defense(_) => None,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Defense(_) => "defense",
            Self::Surrender(_) => "surrender",
        }
    }
}
