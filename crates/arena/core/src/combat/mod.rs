//! Pure combat math.
//!
//! Everything here is side-effect free: callers pass numbers (or read-only
//! fighters and the catalog) in and get numbers out. Rolling the dice and
//! mutating state is the command layer's job.
//!
//! - `damage`: outgoing damage, charge multiplier, bias, crits, heals
//! - `defense`: dodge / block / absorb chances and armor reduction
//! - `modifiers`: aggregate of a fighter's active toggle effects

pub mod damage;
pub mod defense;
pub mod modifiers;

pub use damage::{
    apply_adjust, apply_bias, base_damage, charged_percent, critical_bonus, heal_amount,
    percent_of,
};
pub use defense::{
    ArmorPass, DodgeInputs, absorb_chance, armor_pass, block_chance, block_tier, dodge_chance,
    power_ratio,
};
pub use modifiers::ToggleModifiers;
