//! Defense chances and armor reduction.
//!
//! Chances are computed first, then clamped to `[0, cap]` with the cap from
//! [`CombatConfig::chance_cap`]. A stunned defender always ends at zero.

use crate::config::CombatConfig;
use crate::env::{AbsorbParams, BlockParams};
use crate::state::BlockResult;

/// Defender power over attacker power. An attacker at zero power counts as ratio 1.
pub fn power_ratio(defender_power: u64, attacker_power: u64) -> f64 {
    if attacker_power == 0 {
        return 1.0;
    }
    defender_power as f64 / attacker_power as f64
}

/// Everything the dodge formula looks at.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DodgeInputs {
    pub attacker_power: u64,
    pub defender_power: u64,
    pub uses_ki: bool,
    pub undodgeable: bool,
    pub stunned: bool,
    /// Defender's summed toggle self-dodge.
    pub self_dodge: f64,
    /// Attacker's summed toggle opponent-dodge.
    pub opponent_dodge: f64,
    pub minimum_dodge: Option<f64>,
}

/// Dodge chance.
///
/// # Formula
///
/// ```text
/// ratio = defender / attacker
/// |1 - ratio| <= parity_band  → dodge_base
/// ratio > 1                   → min(dodge_base + floor(ratio / 2) × dodge_step, cap)
/// otherwise                   → 0
/// Ki attack                   → min(chance + ki_dodge_bonus, cap)
/// + self_dodge + opponent_dodge, raised to minimum_dodge
/// stunned → 0; clamp [0, cap]
/// ```
pub fn dodge_chance(inputs: &DodgeInputs, config: &CombatConfig) -> f64 {
    if inputs.undodgeable || inputs.stunned {
        return 0.0;
    }
    let cap = config.chance_cap;
    let ratio = power_ratio(inputs.defender_power, inputs.attacker_power);

    let mut chance = if (1.0 - ratio).abs() <= config.parity_band {
        config.dodge_base
    } else if ratio > 1.0 {
        (config.dodge_base + (ratio / 2.0).floor() * config.dodge_step).min(cap)
    } else {
        0.0
    };

    if inputs.uses_ki {
        chance = (chance + config.ki_dodge_bonus).min(cap);
    }
    chance += inputs.self_dodge + inputs.opponent_dodge;
    if let Some(floor) = inputs.minimum_dodge {
        chance = chance.max(floor);
    }
    chance.clamp(0.0, cap)
}

/// Block success chance: the move's base plus toggle self-block.
pub fn block_chance(params: &BlockParams, self_block: f64, stunned: bool, cap: f64) -> f64 {
    if stunned {
        return 0.0;
    }
    (params.success_chance + self_block).clamp(0.0, cap)
}

/// Second block roll: picks the tier and the damage reduction it gives.
///
/// Toggle shifts move the reductions; the result is clamped to `[0, 1]`.
pub fn block_tier(
    unit: f64,
    params: &BlockParams,
    one_arm_shift: f64,
    two_arm_shift: f64,
) -> (BlockResult, f64) {
    if unit < params.one_arm_chance {
        let reduction = (params.one_arm_reduction + one_arm_shift).clamp(0.0, 1.0);
        (BlockResult::Partial, reduction)
    } else if unit < params.one_arm_chance + params.two_arm_chance {
        let reduction = (params.two_arm_reduction + two_arm_shift).clamp(0.0, 1.0);
        (BlockResult::Full, reduction)
    } else {
        (BlockResult::Failed, 0.0)
    }
}

/// Ki absorb chance, stepping by [`AbsorbParams::STEP`] per full multiple-of-two ratio.
pub fn absorb_chance(params: &AbsorbParams, ratio: f64, stunned: bool, cap: f64) -> f64 {
    if stunned {
        return 0.0;
    }
    let chance = if ratio > 1.0 {
        (params.base_chance + (ratio / 2.0).floor() * AbsorbParams::STEP).min(params.max_chance)
    } else {
        params.base_chance
    };
    chance.clamp(0.0, params.max_chance.min(cap).max(0.0))
}

/// Result of passing damage through one armor piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArmorPass {
    /// Damage left after the armor.
    pub through: u64,
    /// Durability after the hit.
    pub durability: u64,
    /// Damage the armor took out of the hit.
    pub absorbed: u64,
}

/// `after = floor(d × (1 − reduction))`; the difference wears the armor down.
pub fn armor_pass(damage: u64, reduction: f64, durability: u64) -> ArmorPass {
    let through = crate::combat::percent_of(damage, 1.0 - reduction).min(damage);
    let absorbed = damage - through;
    ArmorPass {
        through,
        durability: durability.saturating_sub(absorbed),
        absorbed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    fn inputs(attacker: u64, defender: u64) -> DodgeInputs {
        DodgeInputs {
            attacker_power: attacker,
            defender_power: defender,
            ..DodgeInputs::default()
        }
    }

    #[test]
    fn equal_power_dodge_is_base() {
        let config = CombatConfig::default();
        assert!(close(dodge_chance(&inputs(1000, 1000), &config), 0.15));
        assert!(close(dodge_chance(&inputs(1000, 1040), &config), 0.15));
    }

    #[test]
    fn stronger_defender_steps_up_and_caps() {
        let config = CombatConfig::default();
        // ratio 1.5: no full multiple of two
        assert!(close(dodge_chance(&inputs(1000, 1500), &config), 0.15));
        assert!(close(dodge_chance(&inputs(1000, 2000), &config), 0.5));
        assert!(close(dodge_chance(&inputs(1000, 10_000), &config), 0.9));
        // weaker defender cannot dodge
        assert!(close(dodge_chance(&inputs(1000, 500), &config), 0.0));
    }

    #[test]
    fn ki_bonus_and_toggles_stay_within_cap() {
        let config = CombatConfig::default();
        let mut ki = inputs(1000, 1000);
        ki.uses_ki = true;
        assert!(close(dodge_chance(&ki, &config), 0.3));

        ki.self_dodge = 1.0;
        assert!(close(dodge_chance(&ki, &config), 0.9));

        let mut floored = inputs(1000, 500);
        floored.self_dodge = -1.0;
        floored.minimum_dodge = Some(0.15);
        assert!(close(dodge_chance(&floored, &config), 0.15));
    }

    #[test]
    fn stun_and_undodgeable_zero_the_dodge() {
        let config = CombatConfig::default();
        let mut stunned = inputs(1000, 10_000);
        stunned.minimum_dodge = Some(0.5);
        stunned.stunned = true;
        assert!(close(dodge_chance(&stunned, &config), 0.0));

        let mut undodgeable = inputs(1000, 1000);
        undodgeable.undodgeable = true;
        assert!(close(dodge_chance(&undodgeable, &config), 0.0));
    }

    #[test]
    fn block_tiers() {
        let params = BlockParams::default();
        assert_eq!(block_tier(0.1, &params, 0.0, 0.0), (BlockResult::Partial, 0.25));
        assert_eq!(block_tier(0.6, &params, 0.0, 0.0), (BlockResult::Full, 0.5));
        assert_eq!(block_tier(0.7, &params, 0.0, 0.0), (BlockResult::Failed, 0.0));
        // shifts clamp to [0, 1]
        assert_eq!(block_tier(0.6, &params, 0.0, -0.75), (BlockResult::Full, 0.0));
    }

    #[test]
    fn block_chance_clamps_and_stun_zeroes() {
        let params = BlockParams::default();
        assert_eq!(block_chance(&params, 0.45, false, 0.9), 0.9);
        assert_eq!(block_chance(&params, 0.0, true, 0.9), 0.0);
    }

    #[test]
    fn absorb_steps_by_tenths() {
        let params = AbsorbParams::default();
        assert_eq!(absorb_chance(&params, 1.0, false, 0.9), 0.15);
        assert!((absorb_chance(&params, 4.0, false, 0.9) - 0.35).abs() < 1e-12);
        assert_eq!(absorb_chance(&params, 100.0, false, 0.9), 0.9);
        assert_eq!(absorb_chance(&params, 4.0, true, 0.9), 0.0);
    }

    #[test]
    fn armor_wears_by_what_it_absorbs() {
        let pass = armor_pass(1000, 0.2, 150);
        assert_eq!(pass.through, 800);
        assert_eq!(pass.absorbed, 200);
        assert_eq!(pass.durability, 0);
    }
}
