//! Outgoing damage and healing arithmetic.
//!
//! All results are floored to whole power points and never negative.

use crate::env::{DamageAmount, DamageEffect};

/// `floor(amount × fraction)`, clamped at zero.
pub fn percent_of(amount: u64, fraction: f64) -> u64 {
    let value = (amount as f64 * fraction).floor();
    if value <= 0.0 { 0 } else { value as u64 }
}

/// Damage percent after `level` charge turns: `base × (1 + level)`.
pub fn charged_percent(base: f64, level: u32) -> f64 {
    base * (1.0 + f64::from(level))
}

/// Raw damage before toggle adjustment, bias and crits.
///
/// # Formula
///
/// ```text
/// static:  amount
/// percent: max(floor(basis × percent), 1)   (no minimum when the move's own percent is 0)
/// ```
///
/// `percent` is the effective percent (charge and toggle boosts included);
/// the minimum-of-one rule looks at the move's own base percent.
pub fn base_damage(effect: &DamageEffect, basis: u64, percent: f64) -> u64 {
    match effect.amount {
        DamageAmount::Static(amount) => amount,
        DamageAmount::Percent(base) => {
            let damage = percent_of(basis, percent);
            if base == 0.0 { damage } else { damage.max(1) }
        }
    }
}

/// Applies the summed toggle `total_damage_adjust`: `floor(d × (1 + adjust))`, at least 0.
pub fn apply_adjust(damage: u64, adjust: f64) -> u64 {
    percent_of(damage, 1.0 + adjust)
}

/// Applies the referee bias in percent: `floor(d × (1 + bias / 100))`, at least 0.
pub fn apply_bias(damage: u64, bias_percent: i32) -> u64 {
    if bias_percent == 0 {
        return damage;
    }
    percent_of(damage, 1.0 + f64::from(bias_percent) / 100.0)
}

/// Damage added by a critical hit.
pub fn critical_bonus(damage: u64, increase: f64) -> u64 {
    percent_of(damage, increase)
}

/// Healing for a rolled fraction of max power, never raising power above max.
pub fn heal_amount(power: u64, max_power: u64, fraction: f64) -> u64 {
    percent_of(max_power, fraction).min(max_power.saturating_sub(power))
}
