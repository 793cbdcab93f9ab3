//! Move definitions: a base payload plus an ordered list of typed effects.
//!
//! Moves reference each other (boosted move lists, granted moves) by
//! [`MoveId`]; names only exist for display and for the content loader.

use core::fmt;

use super::error::CatalogError;

/// Stable index of a move in the catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MoveId(pub u16);

impl MoveId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for MoveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "move#{}", self.0)
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum MoveCategory {
    #[default]
    Basic,
    Special,
    Defense,
    Item,
    Other,
    #[strum(to_string = "Transformation", serialize = "Transformations")]
    Transformation,
}

/// Read-only definition of a move.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveDefinition {
    pub id: MoveId,
    pub name: String,
    pub description: String,
    pub category: MoveCategory,
    /// Ki-fueled moves can be absorbed and are easier to dodge.
    pub uses_ki: bool,
    /// Exchanges the move stays unavailable after use.
    pub cooldown: u32,
    pub effects: Vec<MoveEffect>,
}

/// Typed effect descriptors. A move carries any combination of these.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveEffect {
    Damage(DamageEffect),
    SelfDamage(SelfDamageEffect),
    Charge(ChargeEffect),
    Ammo(AmmoEffect),
    Heal(HealEffect),
    Channel(ChannelEffect),
    Transform(TransformEffect),
    Toggle(ToggleEffect),
    Armor(ArmorEffect),
    GrantMoves(Vec<MoveGrant>),
    Defense(DefenseKind),
    SkipTurn,
    Surrender,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageAmount {
    /// Fraction of the attacker's power basis.
    Percent(f64),
    /// Fixed amount, ignores power levels entirely.
    Static(u64),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageEffect {
    pub amount: DamageAmount,
    /// `None` means the move cannot crit.
    pub critical: Option<CriticalHit>,
    pub extra_move_chance: f64,
    pub stun: Option<StunOnHit>,
    pub unblockable: bool,
    pub undodgeable: bool,
    /// Ignores armor reduction.
    pub piercing: bool,
}

impl DamageEffect {
    pub fn percent(percent: f64) -> Self {
        Self {
            amount: DamageAmount::Percent(percent),
            critical: None,
            extra_move_chance: 0.0,
            stun: None,
            unblockable: false,
            undodgeable: false,
            piercing: false,
        }
    }

    pub fn fixed(amount: u64) -> Self {
        Self {
            amount: DamageAmount::Static(amount),
            ..Self::percent(0.0)
        }
    }

    /// The move's own damage percent, 0 for static damage.
    pub fn base_percent(&self) -> f64 {
        match self.amount {
            DamageAmount::Percent(p) => p,
            DamageAmount::Static(_) => 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CriticalHit {
    pub chance: f64,
    /// Fraction of the damage added on a crit.
    pub increase: f64,
}

impl CriticalHit {
    pub const DEFAULT_CHANCE: f64 = 0.15;
    pub const DEFAULT_INCREASE: f64 = 0.5;
}

impl Default for CriticalHit {
    fn default() -> Self {
        Self {
            chance: Self::DEFAULT_CHANCE,
            increase: Self::DEFAULT_INCREASE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StunOnHit {
    pub chance: f64,
    pub duration: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelfDamageEffect {
    /// Fraction of the actor's current power paid per use or charge.
    pub percent: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChargeEffect {
    pub max_level: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmmoEffect {
    pub magazine: u32,
}

impl AmmoEffect {
    pub const DEFAULT_MAGAZINE: u32 = 30;
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealEffect {
    /// Heal range as fractions of max power.
    pub min: f64,
    pub max: f64,
    pub chance: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelEffect {
    /// Own attacks before the boost reverts.
    pub duration: u32,
    /// Power after reverting, as a fraction of the power at activation.
    pub after_effect_ratio: f64,
}

impl Default for ChannelEffect {
    fn default() -> Self {
        Self {
            duration: 5,
            after_effect_ratio: 0.5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransformEffect {
    pub multiplier: u64,
    pub death_penalty_chance: f64,
}

impl Default for TransformEffect {
    fn default() -> Self {
        Self {
            multiplier: 8,
            death_penalty_chance: 0.1,
        }
    }
}

/// Passive modifiers granted while a toggle is active.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ToggleEffect {
    pub damage_boost: Option<DamageBoost>,
    /// Summed across toggles, applied multiplicatively to raw damage.
    pub total_damage_adjust: f64,
    pub self_dodge: f64,
    /// Added to the dodge chance of whoever this fighter attacks.
    pub opponent_dodge: f64,
    pub minimum_dodge: Option<f64>,
    pub self_block: f64,
    pub one_arm_reduction: f64,
    pub two_arm_reduction: f64,
    /// Extra text recorded on activation.
    pub note: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageBoost {
    pub moves: Vec<MoveId>,
    /// Added to the boosted move's damage percent.
    pub amount: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmorEffect {
    pub durability: u64,
    pub reduction: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveGrant {
    pub move_id: MoveId,
    pub uses: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefenseKind {
    Dodge,
    Block(BlockParams),
    Reflect(ReflectParams),
    KiAbsorb(AbsorbParams),
    Nothing,
}

impl DefenseKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dodge => "dodge",
            Self::Block(_) => "block",
            Self::Reflect(_) => "reflect",
            Self::KiAbsorb(_) => "ki_absorb",
            Self::Nothing => "nothing",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockParams {
    pub success_chance: f64,
    /// Second roll below this is a one-arm (partial) block.
    pub one_arm_chance: f64,
    /// Second roll below `one_arm_chance + two_arm_chance` is a full block.
    pub two_arm_chance: f64,
    pub one_arm_reduction: f64,
    pub two_arm_reduction: f64,
}

impl Default for BlockParams {
    fn default() -> Self {
        Self {
            success_chance: 0.55,
            one_arm_chance: 0.55,
            two_arm_chance: 0.11,
            one_arm_reduction: 0.25,
            two_arm_reduction: 0.5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReflectParams {
    pub chance: f64,
}

impl Default for ReflectParams {
    fn default() -> Self {
        Self { chance: 0.99 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbsorbParams {
    pub base_chance: f64,
    pub max_chance: f64,
    /// Fraction of the incoming damage converted into power.
    pub fraction: f64,
}

impl AbsorbParams {
    /// Absorb chance gained per full multiple-of-two power ratio.
    pub const STEP: f64 = 0.1;
}

impl Default for AbsorbParams {
    fn default() -> Self {
        Self {
            base_chance: 0.15,
            max_chance: 0.9,
            fraction: 0.5,
        }
    }
}

macro_rules! effect_accessor {
    ($(#[$meta:meta])* $fn_name:ident, $variant:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $fn_name(&self) -> Option<&$ty> {
            self.effects.iter().find_map(|effect| match effect {
                MoveEffect::$variant(inner) => Some(inner),
                _ => None,
            })
        }
    };
}

impl MoveDefinition {
    /// Creates a definition with no effects.
    pub fn new(id: MoveId, name: impl Into<String>, category: MoveCategory) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            category,
            uses_ki: false,
            cooldown: 0,
            effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: MoveEffect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_ki(mut self) -> Self {
        self.uses_ki = true;
        self
    }

    #[must_use]
    pub fn with_cooldown(mut self, cooldown: u32) -> Self {
        self.cooldown = cooldown;
        self
    }

    effect_accessor!(damage, Damage, DamageEffect);
    effect_accessor!(self_damage, SelfDamage, SelfDamageEffect);
    effect_accessor!(charge, Charge, ChargeEffect);
    effect_accessor!(ammo, Ammo, AmmoEffect);
    effect_accessor!(heal, Heal, HealEffect);
    effect_accessor!(channel, Channel, ChannelEffect);
    effect_accessor!(transform, Transform, TransformEffect);
    effect_accessor!(toggle, Toggle, ToggleEffect);
    effect_accessor!(armor, Armor, ArmorEffect);
    effect_accessor!(defense, Defense, DefenseKind);

    pub fn grants(&self) -> &[MoveGrant] {
        self.effects
            .iter()
            .find_map(|effect| match effect {
                MoveEffect::GrantMoves(grants) => Some(grants.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn is_toggle(&self) -> bool {
        self.toggle().is_some() || self.armor().is_some()
    }

    pub fn is_skip(&self) -> bool {
        self.effects.iter().any(|e| matches!(e, MoveEffect::SkipTurn))
    }

    pub fn is_surrender(&self) -> bool {
        self.effects.iter().any(|e| matches!(e, MoveEffect::Surrender))
    }

    /// Healing items with finite charges (Ki heals are unlimited).
    pub fn consumes_item_charge(&self) -> bool {
        self.heal().is_some() && !self.uses_ki
    }

    /// Checks parameter ranges. References to other moves are checked by the catalog.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let name = self.name.as_str();
        let probability = |field: &'static str, value: f64| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(CatalogError::OutOfRange {
                    name: name.to_owned(),
                    field,
                    value,
                })
            }
        };
        let non_negative = |field: &'static str, value: f64| {
            if value >= 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(CatalogError::OutOfRange {
                    name: name.to_owned(),
                    field,
                    value,
                })
            }
        };

        for effect in &self.effects {
            match effect {
                MoveEffect::Damage(damage) => {
                    if let DamageAmount::Percent(p) = damage.amount {
                        non_negative("damage_percent", p)?;
                    }
                    if let Some(crit) = damage.critical {
                        probability("critical_chance", crit.chance)?;
                        non_negative("critical_increase", crit.increase)?;
                    }
                    probability("extra_move_chance", damage.extra_move_chance)?;
                    if let Some(stun) = damage.stun {
                        probability("stun_chance", stun.chance)?;
                    }
                }
                MoveEffect::SelfDamage(self_damage) => {
                    probability("self_damage_percent", self_damage.percent)?
                }
                MoveEffect::Charge(charge) if charge.max_level == 0 => {
                    return Err(CatalogError::OutOfRange {
                        name: name.to_owned(),
                        field: "max_charge_level",
                        value: 0.0,
                    });
                }
                MoveEffect::Heal(heal) => {
                    non_negative("heal_min", heal.min)?;
                    non_negative("heal_max", heal.max)?;
                    probability("heal_chance", heal.chance)?;
                    if heal.min > heal.max {
                        return Err(CatalogError::OutOfRange {
                            name: name.to_owned(),
                            field: "heal_min",
                            value: heal.min,
                        });
                    }
                }
                MoveEffect::Channel(channel) => {
                    probability("after_effect_ratio", channel.after_effect_ratio)?
                }
                MoveEffect::Transform(transform) => {
                    probability("death_penalty_chance", transform.death_penalty_chance)?
                }
                MoveEffect::Toggle(toggle) => {
                    if let Some(boost) = &toggle.damage_boost {
                        non_negative("damage_boost", boost.amount)?;
                    }
                    if let Some(minimum) = toggle.minimum_dodge {
                        probability("minimum_dodge", minimum)?;
                    }
                }
                MoveEffect::Armor(armor) => probability("armor_reduction", armor.reduction)?,
                MoveEffect::Defense(DefenseKind::Block(block)) => {
                    probability("block_success_chance", block.success_chance)?;
                    probability("one_arm_chance", block.one_arm_chance)?;
                    probability("two_arm_chance", block.two_arm_chance)?;
                    probability("one_arm_reduction", block.one_arm_reduction)?;
                    probability("two_arm_reduction", block.two_arm_reduction)?;
                }
                MoveEffect::Defense(DefenseKind::Reflect(reflect)) => {
                    probability("reflect_chance", reflect.chance)?
                }
                MoveEffect::Defense(DefenseKind::KiAbsorb(absorb)) => {
                    probability("absorb_base_chance", absorb.base_chance)?;
                    probability("absorb_max_chance", absorb.max_chance)?;
                    probability("absorb_fraction", absorb.fraction)?;
                }
                _ => {}
            }
        }
        Ok(())
    }
}
