//! Shared fixtures for the arena-core integration tests.
#![allow(dead_code)]

use arena_core::env::{
    AbsorbParams, AmmoEffect, ArmorEffect, BlockParams, ChannelEffect, ChargeEffect, DamageBoost,
    DamageEffect, HealEffect, MoveGrant, ReflectParams, SelfDamageEffect, StunOnHit,
    ToggleEffect, TransformEffect,
};
use arena_core::state::Rotation;
use arena_core::{
    Battle, CombatConfig, CombatEngine, CombatState, Command, DefenseKind, Env, ExecuteError,
    ExecutionOutcome, FighterConfig, FighterId, MoveCategory, MoveDefinition, MoveEffect, MoveId,
    Race, RngOracle, Roster, RollbackError, StaticMoveCatalog,
};

pub const PUNCH: MoveId = MoveId(0);
pub const KAMEHAMEHA: MoveId = MoveId(1);
pub const DODGE: MoveId = MoveId(2);
pub const BLOCK: MoveId = MoveId(3);
pub const NOTHING: MoveId = MoveId(4);
pub const REFLECT: MoveId = MoveId(5);
pub const KI_ABSORB: MoveId = MoveId(6);
pub const SURRENDER: MoveId = MoveId(7);
pub const DRAGON_ARMOR: MoveId = MoveId(8);
pub const STUN_PUNCH: MoveId = MoveId(9);
pub const SKIP: MoveId = MoveId(10);
pub const SENZU_BEAN: MoveId = MoveId(11);
pub const POWER_UP: MoveId = MoveId(12);
pub const SUPER_SAIYAN: MoveId = MoveId(13);
pub const KAIOKEN: MoveId = MoveId(14);
pub const SPIRIT_BOMB: MoveId = MoveId(15);
pub const PISTOL: MoveId = MoveId(16);

pub const F1: FighterId = FighterId(0);
pub const F2: FighterId = FighterId(1);
pub const F3: FighterId = FighterId(2);

/// Dice that always return the same value.
#[derive(Clone, Copy, Debug)]
pub struct FixedRng(u32);

impl FixedRng {
    /// Every roll with a positive chance succeeds.
    pub fn always() -> Self {
        Self(0)
    }

    /// Only certain (chance 1.0) rolls succeed.
    pub fn never() -> Self {
        Self(u32::MAX)
    }
}

impl RngOracle for FixedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.0
    }
}

pub fn catalog() -> StaticMoveCatalog {
    let defense = |id: MoveId, name: &str, kind: DefenseKind| {
        MoveDefinition::new(id, name, MoveCategory::Defense).with_effect(MoveEffect::Defense(kind))
    };

    StaticMoveCatalog::new(vec![
        MoveDefinition::new(PUNCH, "Punch", MoveCategory::Basic)
            .with_effect(MoveEffect::Damage(DamageEffect::percent(0.03))),
        MoveDefinition::new(KAMEHAMEHA, "Kamehameha", MoveCategory::Special)
            .with_ki()
            .with_effect(MoveEffect::Damage(DamageEffect::percent(0.06)))
            .with_effect(MoveEffect::SelfDamage(SelfDamageEffect { percent: 0.03 }))
            .with_effect(MoveEffect::Charge(ChargeEffect { max_level: 10 })),
        defense(DODGE, "Dodge", DefenseKind::Dodge),
        defense(BLOCK, "Block", DefenseKind::Block(BlockParams::default())),
        defense(NOTHING, "Nothing", DefenseKind::Nothing),
        defense(REFLECT, "Reflect", DefenseKind::Reflect(ReflectParams::default())),
        defense(KI_ABSORB, "Ki Absorb", DefenseKind::KiAbsorb(AbsorbParams::default())),
        MoveDefinition::new(SURRENDER, "Surrender", MoveCategory::Other)
            .with_effect(MoveEffect::Surrender),
        MoveDefinition::new(DRAGON_ARMOR, "Dragon Armor", MoveCategory::Item).with_effect(
            MoveEffect::Armor(ArmorEffect {
                durability: 50,
                reduction: 0.5,
            }),
        ),
        MoveDefinition::new(STUN_PUNCH, "Stun Punch", MoveCategory::Basic).with_effect(
            MoveEffect::Damage(DamageEffect {
                stun: Some(StunOnHit {
                    chance: 1.0,
                    duration: 1,
                }),
                ..DamageEffect::percent(0.03)
            }),
        ),
        MoveDefinition::new(SKIP, "Skip", MoveCategory::Other).with_effect(MoveEffect::SkipTurn),
        MoveDefinition::new(SENZU_BEAN, "Senzu Bean", MoveCategory::Item).with_effect(
            MoveEffect::Heal(HealEffect {
                min: 0.1,
                max: 0.3,
                chance: 0.5,
            }),
        ),
        MoveDefinition::new(POWER_UP, "Power Up", MoveCategory::Special)
            .with_effect(MoveEffect::Channel(ChannelEffect::default())),
        MoveDefinition::new(SUPER_SAIYAN, "Super Saiyan", MoveCategory::Transformation)
            .with_effect(MoveEffect::Transform(TransformEffect::default())),
        MoveDefinition::new(KAIOKEN, "Kaioken", MoveCategory::Special)
            .with_effect(MoveEffect::Toggle(ToggleEffect {
                damage_boost: Some(DamageBoost {
                    moves: vec![PUNCH],
                    amount: 0.03,
                }),
                ..ToggleEffect::default()
            }))
            .with_effect(MoveEffect::GrantMoves(vec![MoveGrant {
                move_id: SPIRIT_BOMB,
                uses: 1,
            }])),
        MoveDefinition::new(SPIRIT_BOMB, "Spirit Bomb", MoveCategory::Special)
            .with_effect(MoveEffect::Damage(DamageEffect::percent(0.1))),
        MoveDefinition::new(PISTOL, "Pistol", MoveCategory::Item)
            .with_effect(MoveEffect::Damage(DamageEffect::fixed(65)))
            .with_effect(MoveEffect::Ammo(AmmoEffect { magazine: 2 })),
    ])
    .expect("test catalog is valid")
}

/// A battle plus everything needed to drive it.
pub struct Harness<R: RngOracle> {
    pub catalog: StaticMoveCatalog,
    pub rng: R,
    pub config: CombatConfig,
    pub battle: Battle,
}

impl<R: RngOracle + 'static> Harness<R> {
    pub fn new(powers: &[u64], rng: R) -> Self {
        let catalog = catalog();
        let configs = powers.iter().enumerate().map(|(i, &power)| {
            FighterConfig::new(format!("Fighter {}", i + 1), Race::Human, power).with_moves([
                PUNCH,
                KAMEHAMEHA,
                SURRENDER,
                DRAGON_ARMOR,
                STUN_PUNCH,
                SKIP,
                SENZU_BEAN,
                POWER_UP,
                SUPER_SAIYAN,
                KAIOKEN,
                PISTOL,
            ])
        });
        let roster = Roster::build(configs, &catalog).expect("roster");
        let config = CombatConfig::default();
        let battle = Battle::new(CombatState::new(42, roster), config.history_capacity);
        Self {
            catalog,
            rng,
            config,
            battle,
        }
    }

    pub fn execute(&mut self, command: impl Into<Command>) -> Result<ExecutionOutcome, ExecuteError> {
        let env = Env::with_all(&self.catalog, &self.rng, &self.config);
        CombatEngine::new(&mut self.battle).execute(env.as_combat_env(), &command.into())
    }

    pub fn rollback_to(&mut self, turn: u32) -> Result<ExecutionOutcome, RollbackError> {
        CombatEngine::new(&mut self.battle).rollback_to(turn)
    }

    pub fn reset(&mut self) -> ExecutionOutcome {
        let env = Env::with_all(&self.catalog, &self.rng, &self.config);
        CombatEngine::new(&mut self.battle)
            .reset(env.as_combat_env())
            .expect("catalog available")
    }

    pub fn next_actor(&mut self) -> Rotation {
        CombatEngine::new(&mut self.battle).peek_next_actor()
    }

    pub fn state(&self) -> &CombatState {
        &self.battle.state
    }

    pub fn power(&self, id: FighterId) -> u64 {
        self.battle.state.fighter(id).map_or(0, |f| f.power)
    }
}
