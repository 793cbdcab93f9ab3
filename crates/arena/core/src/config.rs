/// Combat engine constants and tunable parameters.
///
/// Per-move numbers (damage, crit odds, block thresholds, ...) live on the move
/// definitions themselves. This struct only carries the engine-wide rules that
/// no single move owns.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Dodge chance when attacker and defender are within the parity band.
    pub dodge_base: f64,
    /// Relative power difference treated as "equal" (0.05 = within 5%).
    pub parity_band: f64,
    /// Dodge chance gained per full multiple-of-two power ratio.
    pub dodge_step: f64,
    /// Flat bonus to dodge against Ki-fueled attacks.
    pub ki_dodge_bonus: f64,
    /// Upper bound for every dodge, block and absorb chance.
    pub chance_cap: f64,
    /// Stun duration used when a stunning move does not declare one.
    pub default_stun_duration: u32,
    /// Number of pre-command snapshots retained for rollback.
    pub history_capacity: usize,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Fixed rotation size. Slots beyond the roster length have no backing record.
    pub const MAX_COMBATANTS: usize = 8;
    pub const MAX_ACTIVE_TOGGLES: usize = 16;
    pub const MAX_GRANTS_PER_TOGGLE: usize = 4;
    pub const HISTORY_LIMIT: usize = 20;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_DODGE_BASE: f64 = 0.15;
    pub const DEFAULT_PARITY_BAND: f64 = 0.05;
    pub const DEFAULT_DODGE_STEP: f64 = 0.35;
    pub const DEFAULT_KI_DODGE_BONUS: f64 = 0.15;
    pub const DEFAULT_CHANCE_CAP: f64 = 0.9;
    pub const DEFAULT_STUN_DURATION: u32 = 1;

    pub fn new() -> Self {
        Self {
            dodge_base: Self::DEFAULT_DODGE_BASE,
            parity_band: Self::DEFAULT_PARITY_BAND,
            dodge_step: Self::DEFAULT_DODGE_STEP,
            ki_dodge_bonus: Self::DEFAULT_KI_DODGE_BONUS,
            chance_cap: Self::DEFAULT_CHANCE_CAP,
            default_stun_duration: Self::DEFAULT_STUN_DURATION,
            history_capacity: Self::HISTORY_LIMIT,
        }
    }

    /// Default tuning with a custom rollback depth, clamped to `1..=HISTORY_LIMIT`.
    pub fn with_history_capacity(history_capacity: usize) -> Self {
        Self {
            history_capacity: Self::clamp_history(history_capacity),
            ..Self::new()
        }
    }

    pub const fn clamp_history(capacity: usize) -> usize {
        if capacity == 0 {
            1
        } else if capacity > Self::HISTORY_LIMIT {
            Self::HISTORY_LIMIT
        } else {
            capacity
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
