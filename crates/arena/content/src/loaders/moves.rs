//! Move catalog loader.
//!
//! The file format mirrors [`MoveDefinition`] but moves refer to each other by
//! name and optional parameters fall back to the standard defaults. Ids are
//! assigned in file order.

use std::collections::BTreeMap;
use std::path::Path;

use arena_core::env::{
    AbsorbParams, AmmoEffect, ArmorEffect, BlockParams, ChannelEffect, ChargeEffect,
    CriticalHit, DamageAmount, DamageBoost, DamageEffect, HealEffect, MoveGrant, ReflectParams,
    SelfDamageEffect, StunOnHit, ToggleEffect, TransformEffect,
};
use arena_core::{
    DefenseKind, MoveCategory, MoveDefinition, MoveEffect, MoveId, StaticMoveCatalog,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Move catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveCatalogFile {
    pub moves: Vec<MoveSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: MoveCategory,
    #[serde(default)]
    pub uses_ki: bool,
    #[serde(default)]
    pub cooldown: u32,
    #[serde(default)]
    pub effects: Vec<EffectSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EffectSpec {
    Damage(DamageSpec),
    /// Fraction of current power paid per use or charge.
    SelfDamage(f64),
    /// Maximum charge level.
    Charge(u32),
    Ammo(AmmoSpec),
    Heal(HealEffect),
    Channel(ChannelSpec),
    Transform(TransformSpec),
    Toggle(ToggleSpec),
    Armor(ArmorEffect),
    GrantMoves(Vec<GrantSpec>),
    Defense(DefenseSpec),
    SkipTurn,
    Surrender,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageSpec {
    pub percent: Option<f64>,
    /// Static damage; takes precedence over `percent`.
    pub fixed: Option<u64>,
    pub critical: bool,
    pub critical_chance: Option<f64>,
    pub critical_increase: Option<f64>,
    pub extra_move_chance: f64,
    pub stun_chance: Option<f64>,
    pub stun_duration: Option<u32>,
    pub unblockable: bool,
    pub undodgeable: bool,
    pub piercing: bool,
}

impl DamageSpec {
    pub const DEFAULT_STUN_DURATION: u32 = 1;

    fn resolve(&self) -> DamageEffect {
        let amount = match self.fixed {
            Some(fixed) => DamageAmount::Static(fixed),
            None => DamageAmount::Percent(self.percent.unwrap_or(0.0)),
        };
        let critical = self.critical.then(|| CriticalHit {
            chance: self.critical_chance.unwrap_or(CriticalHit::DEFAULT_CHANCE),
            increase: self.critical_increase.unwrap_or(CriticalHit::DEFAULT_INCREASE),
        });
        let stun = self.stun_chance.map(|chance| StunOnHit {
            chance,
            duration: self.stun_duration.unwrap_or(Self::DEFAULT_STUN_DURATION),
        });
        DamageEffect {
            amount,
            critical,
            extra_move_chance: self.extra_move_chance,
            stun,
            unblockable: self.unblockable,
            undodgeable: self.undodgeable,
            piercing: self.piercing,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AmmoSpec {
    pub magazine: u32,
}

impl Default for AmmoSpec {
    fn default() -> Self {
        Self {
            magazine: AmmoEffect::DEFAULT_MAGAZINE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelSpec {
    pub duration: u32,
    pub after_effect_ratio: f64,
}

impl Default for ChannelSpec {
    fn default() -> Self {
        let defaults = ChannelEffect::default();
        Self {
            duration: defaults.duration,
            after_effect_ratio: defaults.after_effect_ratio,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformSpec {
    pub multiplier: u64,
    pub death_penalty_chance: f64,
}

impl Default for TransformSpec {
    fn default() -> Self {
        let defaults = TransformEffect::default();
        Self {
            multiplier: defaults.multiplier,
            death_penalty_chance: defaults.death_penalty_chance,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleSpec {
    /// Moves whose damage percent is raised while active.
    pub boosts: Vec<String>,
    pub boost_amount: f64,
    pub total_damage_adjust: f64,
    pub self_dodge: f64,
    pub opponent_dodge: f64,
    pub minimum_dodge: Option<f64>,
    pub self_block: f64,
    pub one_arm_reduction: f64,
    pub two_arm_reduction: f64,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantSpec {
    pub name: String,
    pub uses: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DefenseSpec {
    Dodge,
    Block(BlockSpec),
    Reflect(ReflectSpec),
    KiAbsorb(AbsorbSpec),
    Nothing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockSpec {
    pub success_chance: f64,
    pub one_arm_chance: f64,
    pub two_arm_chance: f64,
    pub one_arm_reduction: f64,
    pub two_arm_reduction: f64,
}

impl Default for BlockSpec {
    fn default() -> Self {
        let d = BlockParams::default();
        Self {
            success_chance: d.success_chance,
            one_arm_chance: d.one_arm_chance,
            two_arm_chance: d.two_arm_chance,
            one_arm_reduction: d.one_arm_reduction,
            two_arm_reduction: d.two_arm_reduction,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectSpec {
    pub chance: f64,
}

impl Default for ReflectSpec {
    fn default() -> Self {
        Self {
            chance: ReflectParams::default().chance,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AbsorbSpec {
    pub base_chance: f64,
    pub max_chance: f64,
    pub fraction: f64,
}

impl Default for AbsorbSpec {
    fn default() -> Self {
        let d = AbsorbParams::default();
        Self {
            base_chance: d.base_chance,
            max_chance: d.max_chance,
            fraction: d.fraction,
        }
    }
}

impl DefenseSpec {
    fn resolve(&self) -> DefenseKind {
        match self {
            Self::Dodge => DefenseKind::Dodge,
            Self::Block(b) => DefenseKind::Block(BlockParams {
                success_chance: b.success_chance,
                one_arm_chance: b.one_arm_chance,
                two_arm_chance: b.two_arm_chance,
                one_arm_reduction: b.one_arm_reduction,
                two_arm_reduction: b.two_arm_reduction,
            }),
            Self::Reflect(r) => DefenseKind::Reflect(ReflectParams { chance: r.chance }),
            Self::KiAbsorb(a) => DefenseKind::KiAbsorb(AbsorbParams {
                base_chance: a.base_chance,
                max_chance: a.max_chance,
                fraction: a.fraction,
            }),
            Self::Nothing => DefenseKind::Nothing,
        }
    }
}

/// Loader for the move catalog from RON files.
pub struct MoveLoader;

impl MoveLoader {
    /// Load and validate a move catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<StaticMoveCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<StaticMoveCatalog> {
        let file: MoveCatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse move catalog RON: {}", e))?;
        Self::build(file.moves)
    }

    /// Assigns ids in order, resolves names and validates the result.
    pub fn build(specs: Vec<MoveSpec>) -> LoadResult<StaticMoveCatalog> {
        if specs.len() > usize::from(u16::MAX) {
            anyhow::bail!("Move catalog has {} moves, at most {} allowed", specs.len(), u16::MAX);
        }

        let mut ids = BTreeMap::new();
        for (index, spec) in specs.iter().enumerate() {
            if ids.insert(spec.name.as_str(), MoveId(index as u16)).is_some() {
                anyhow::bail!("Duplicate move name '{}'", spec.name);
            }
        }
        let resolve = |owner: &str, name: &str| {
            ids.get(name).copied().ok_or_else(|| {
                anyhow::anyhow!("Move '{}' references unknown move '{}'", owner, name)
            })
        };

        let mut definitions = Vec::with_capacity(specs.len());
        for (index, spec) in specs.iter().enumerate() {
            let mut def = MoveDefinition::new(MoveId(index as u16), &spec.name, spec.category);
            def.description = spec.description.clone();
            def.uses_ki = spec.uses_ki;
            def.cooldown = spec.cooldown;

            for effect in &spec.effects {
                let effect = match effect {
                    EffectSpec::Damage(damage) => MoveEffect::Damage(damage.resolve()),
                    EffectSpec::SelfDamage(percent) => {
                        MoveEffect::SelfDamage(SelfDamageEffect { percent: *percent })
                    }
                    EffectSpec::Charge(max_level) => MoveEffect::Charge(ChargeEffect {
                        max_level: *max_level,
                    }),
                    EffectSpec::Ammo(ammo) => MoveEffect::Ammo(AmmoEffect {
                        magazine: ammo.magazine,
                    }),
                    EffectSpec::Heal(heal) => MoveEffect::Heal(*heal),
                    EffectSpec::Channel(channel) => MoveEffect::Channel(ChannelEffect {
                        duration: channel.duration,
                        after_effect_ratio: channel.after_effect_ratio,
                    }),
                    EffectSpec::Transform(transform) => MoveEffect::Transform(TransformEffect {
                        multiplier: transform.multiplier,
                        death_penalty_chance: transform.death_penalty_chance,
                    }),
                    EffectSpec::Toggle(toggle) => {
                        let damage_boost = if toggle.boosts.is_empty() {
                            None
                        } else {
                            let moves = toggle
                                .boosts
                                .iter()
                                .map(|name| resolve(&spec.name, name))
                                .collect::<LoadResult<Vec<_>>>()?;
                            Some(DamageBoost {
                                moves,
                                amount: toggle.boost_amount,
                            })
                        };
                        MoveEffect::Toggle(ToggleEffect {
                            damage_boost,
                            total_damage_adjust: toggle.total_damage_adjust,
                            self_dodge: toggle.self_dodge,
                            opponent_dodge: toggle.opponent_dodge,
                            minimum_dodge: toggle.minimum_dodge,
                            self_block: toggle.self_block,
                            one_arm_reduction: toggle.one_arm_reduction,
                            two_arm_reduction: toggle.two_arm_reduction,
                            note: toggle.note.clone(),
                        })
                    }
                    EffectSpec::Armor(armor) => MoveEffect::Armor(*armor),
                    EffectSpec::GrantMoves(grants) => MoveEffect::GrantMoves(
                        grants
                            .iter()
                            .map(|grant| {
                                Ok(MoveGrant {
                                    move_id: resolve(&spec.name, &grant.name)?,
                                    uses: grant.uses,
                                })
                            })
                            .collect::<LoadResult<Vec<_>>>()?,
                    ),
                    EffectSpec::Defense(defense) => MoveEffect::Defense(defense.resolve()),
                    EffectSpec::SkipTurn => MoveEffect::SkipTurn,
                    EffectSpec::Surrender => MoveEffect::Surrender,
                };
                def.effects.push(effect);
            }
            definitions.push(def);
        }

        StaticMoveCatalog::new(definitions)
            .map_err(|e| anyhow::anyhow!("Invalid move catalog: {}", e))
    }
}
