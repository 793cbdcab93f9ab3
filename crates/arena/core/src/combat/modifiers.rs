//! Summed passive modifiers from a fighter's active toggles.

use crate::env::{MoveId, MoveOracle};
use crate::state::Fighter;

/// Aggregate of every active toggle's [`ToggleEffect`](crate::env::ToggleEffect).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ToggleModifiers {
    pub total_damage_adjust: f64,
    pub self_dodge: f64,
    pub opponent_dodge: f64,
    /// Highest declared dodge floor, if any toggle declares one.
    pub minimum_dodge: Option<f64>,
    pub self_block: f64,
    pub one_arm_reduction: f64,
    pub two_arm_reduction: f64,
}

impl ToggleModifiers {
    pub fn collect<M>(fighter: &Fighter, catalog: &M) -> Self
    where
        M: MoveOracle + ?Sized,
    {
        let mut mods = Self::default();
        let effects = fighter
            .status
            .toggles
            .iter()
            .filter_map(|active| catalog.definition(active.move_id))
            .filter_map(|def| def.toggle());

        for effect in effects {
            mods.total_damage_adjust += effect.total_damage_adjust;
            mods.self_dodge += effect.self_dodge;
            mods.opponent_dodge += effect.opponent_dodge;
            mods.self_block += effect.self_block;
            mods.one_arm_reduction += effect.one_arm_reduction;
            mods.two_arm_reduction += effect.two_arm_reduction;
            if let Some(floor) = effect.minimum_dodge {
                mods.minimum_dodge = Some(mods.minimum_dodge.map_or(floor, |m| m.max(floor)));
            }
        }
        mods
    }

    /// Damage-percent boost active toggles give `move_id`.
    pub fn damage_boost<M>(fighter: &Fighter, move_id: MoveId, catalog: &M) -> f64
    where
        M: MoveOracle + ?Sized,
    {
        fighter
            .status
            .toggles
            .iter()
            .filter_map(|active| catalog.definition(active.move_id))
            .filter_map(|def| def.toggle()?.damage_boost.as_ref())
            .filter(|boost| boost.moves.contains(&move_id))
            .map(|boost| boost.amount)
            .sum()
    }
}
