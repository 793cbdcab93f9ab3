//! Defense resolution for a pending contested attack.

use super::CommandTransition;
use super::specials::set_cooldown;
use crate::combat::{
    DodgeInputs, ToggleModifiers, absorb_chance, armor_pass, block_chance, block_tier,
    dodge_chance, percent_of, power_ratio,
};
use crate::env::{
    CombatEnv, DefenseKind, MoveDefinition, MoveId, MoveOracle, OracleError, RngOracle,
    RollContext,
};
use crate::error::{CombatError, ErrorKind, ErrorSeverity};
use crate::state::{
    BlockResult, CombatState, FighterId, LogEntry, LogKind, OutcomeFlags, PendingDefense,
};

/// The pending defender picks a defense move.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefendCommand {
    pub defender: FighterId,
    pub move_id: MoveId,
}

impl DefendCommand {
    pub fn new(defender: FighterId, move_id: MoveId) -> Self {
        Self { defender, move_id }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DefenseError {
    #[error("no defense is pending")]
    NothingPending,

    #[error("defense expected from {expected}, got {got}")]
    WrongDefender { expected: FighterId, got: FighterId },

    #[error("fighter slot {0} has no backing record")]
    UnknownFighter(FighterId),

    #[error("{0} is not a defense move")]
    NotADefense(MoveId),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl CombatError for DefenseError {
    fn severity(&self) -> ErrorSeverity {
        use DefenseError::*;
        match self {
            NothingPending | WrongDefender { .. } => ErrorSeverity::Recoverable,
            UnknownFighter(_) | NotADefense(_) => ErrorSeverity::Validation,
            Oracle(inner) => inner.severity(),
        }
    }

    fn kind(&self) -> ErrorKind {
        use DefenseError::*;
        match self {
            NothingPending | WrongDefender { .. } => ErrorKind::InvalidCommandSequence,
            UnknownFighter(_) => ErrorKind::UnknownCombatantReference,
            NotADefense(_) => ErrorKind::UnavailableMove,
            Oracle(inner) => inner.kind(),
        }
    }

    fn error_code(&self) -> &'static str {
        use DefenseError::*;
        match self {
            NothingPending => "DEFENSE_NOTHING_PENDING",
            WrongDefender { .. } => "DEFENSE_WRONG_DEFENDER",
            UnknownFighter(_) => "DEFENSE_UNKNOWN_FIGHTER",
            NotADefense(_) => "DEFENSE_NOT_A_DEFENSE",
            Oracle(inner) => inner.error_code(),
        }
    }
}

/// Numbers produced by the defense-specific step, before armor.
#[derive(Default)]
struct Contest {
    damage: u64,
    flags: OutcomeFlags,
    dodged: bool,
    absorbed: u64,
    reflected: u64,
    block: Option<BlockResult>,
    dodge_chance: Option<f64>,
}

impl DefendCommand {
    fn contest(
        &self,
        state: &CombatState,
        env: &CombatEnv<'_>,
        pending: &PendingDefense,
        attack: &MoveDefinition,
        defense: DefenseKind,
    ) -> Result<Contest, DefenseError> {
        let catalog = env.moves()?;
        let rng: &dyn RngOracle = env.rng()?;
        let config = env.config()?;
        let attacker = state
            .fighter(pending.attacker)
            .ok_or(DefenseError::UnknownFighter(pending.attacker))?;
        let defender = state
            .fighter(self.defender)
            .ok_or(DefenseError::UnknownFighter(self.defender))?;

        let effect = attack.damage();
        let stunned = defender.is_stunned();
        let own = ToggleModifiers::collect(defender, catalog);
        let seed = |context| state.roll_seed(self.defender, context);

        let mut contest = Contest {
            damage: pending.damage,
            ..Contest::default()
        };

        match defense {
            DefenseKind::Dodge => {
                let chance = dodge_chance(
                    &DodgeInputs {
                        attacker_power: attacker.power,
                        defender_power: defender.power,
                        uses_ki: attack.uses_ki,
                        undodgeable: effect.is_some_and(|e| e.undodgeable),
                        stunned,
                        self_dodge: own.self_dodge,
                        opponent_dodge: ToggleModifiers::collect(attacker, catalog).opponent_dodge,
                        minimum_dodge: own.minimum_dodge,
                    },
                    config,
                );
                contest.dodge_chance = Some(chance);
                if rng.roll(seed(RollContext::Dodge), chance) {
                    contest.dodged = true;
                    contest.damage = 0;
                    contest.flags |= OutcomeFlags::DODGED;
                }
            }
            DefenseKind::Block(params) => {
                let unblockable = effect.is_some_and(|e| e.unblockable);
                let chance = if unblockable {
                    0.0
                } else {
                    block_chance(&params, own.self_block, stunned, config.chance_cap)
                };
                let (tier, reduction) = if rng.roll(seed(RollContext::Block), chance) {
                    block_tier(
                        rng.unit(seed(RollContext::BlockTier)),
                        &params,
                        own.one_arm_reduction,
                        own.two_arm_reduction,
                    )
                } else {
                    (BlockResult::Failed, 0.0)
                };
                contest.block = Some(tier);
                if tier != BlockResult::Failed {
                    contest.damage = percent_of(contest.damage, 1.0 - reduction);
                    contest.flags |= OutcomeFlags::BLOCKED;
                }
            }
            DefenseKind::Reflect(params) => {
                if !stunned && rng.roll(seed(RollContext::Reflect), params.chance) {
                    contest.reflected = contest.damage;
                    contest.damage = 0;
                    contest.flags |= OutcomeFlags::REFLECTED;
                }
            }
            DefenseKind::KiAbsorb(params) => {
                if attack.uses_ki {
                    let ratio = power_ratio(defender.power, attacker.power);
                    let chance = absorb_chance(&params, ratio, stunned, config.chance_cap);
                    if rng.roll(seed(RollContext::KiAbsorb), chance) {
                        contest.absorbed = percent_of(contest.damage, params.fraction);
                        contest.damage = 0;
                        contest.flags |= OutcomeFlags::ABSORBED;
                    }
                }
            }
            DefenseKind::Nothing => {}
        }
        Ok(contest)
    }
}

/// Runs damage through each active armor in activation order. Returns (through, absorbed, broken names).
fn wear_armor<M>(
    state: &mut CombatState,
    defender: FighterId,
    mut damage: u64,
    catalog: &M,
) -> (u64, u64, Vec<String>)
where
    M: MoveOracle + ?Sized,
{
    let Some(fighter) = state.fighter_mut(defender) else {
        return (damage, 0, Vec::new());
    };

    let mut absorbed = 0;
    for toggle in fighter.status.toggles.iter_mut() {
        let (Some(durability), Some(armor)) = (
            toggle.durability,
            catalog.definition(toggle.move_id).and_then(|def| def.armor()),
        ) else {
            continue;
        };
        let pass = armor_pass(damage, armor.reduction, durability);
        toggle.durability = Some(pass.durability);
        absorbed += pass.absorbed;
        damage = pass.through;
    }

    let broken = fighter
        .status
        .toggles
        .remove_broken()
        .into_iter()
        .filter_map(|id| catalog.definition(id).map(|def| def.name.clone()))
        .collect();
    (damage, absorbed, broken)
}

impl CommandTransition for DefendCommand {
    type Error = DefenseError;
    type Result = u64;

    fn pre_validate(&self, state: &CombatState, env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        let pending = state
            .pending_defense()
            .ok_or(DefenseError::NothingPending)?;
        if !state.roster.contains(self.defender) {
            return Err(DefenseError::UnknownFighter(self.defender));
        }
        if pending.defender != self.defender {
            return Err(DefenseError::WrongDefender {
                expected: pending.defender,
                got: self.defender,
            });
        }
        let def = env.definition(self.move_id)?;
        def.defense()
            .map(|_| ())
            .ok_or(DefenseError::NotADefense(self.move_id))
    }

    /// Returns the damage that landed on the defender.
    fn apply(
        &self,
        state: &mut CombatState,
        env: &CombatEnv<'_>,
    ) -> Result<Self::Result, Self::Error> {
        let pending = state
            .pending_defense()
            .cloned()
            .ok_or(DefenseError::NothingPending)?;
        let catalog = env.moves()?;
        let rng: &dyn RngOracle = env.rng()?;
        let config = env.config()?;
        let attack = env.definition(pending.move_id)?;
        let defense_def = env.definition(self.move_id)?;
        let defense = *defense_def
            .defense()
            .ok_or(DefenseError::NotADefense(self.move_id))?;

        let mut contest = self.contest(state, env, &pending, attack, defense)?;
        let effect = attack.damage();
        let piercing = effect.is_some_and(|e| e.piercing);

        let mut armor_absorbed = 0;
        let mut broken = Vec::new();
        if !piercing && contest.damage > 0 {
            let (through, absorbed, names) =
                wear_armor(state, self.defender, contest.damage, catalog);
            contest.damage = through;
            armor_absorbed = absorbed;
            broken = names;
        }

        let stun_seed = state.roll_seed(self.defender, RollContext::Stun);
        let turn = state.turn.number;

        if contest.reflected > 0 {
            if let Some(attacker) = state.fighter_mut(pending.attacker) {
                attacker.take_damage(contest.reflected);
            }
        }

        let defender = state
            .fighter_mut(self.defender)
            .ok_or(DefenseError::UnknownFighter(self.defender))?;
        let landed = defender.take_damage(contest.damage);
        if contest.absorbed > 0 {
            defender.power += contest.absorbed;
            defender.max_power += contest.absorbed;
            defender.config.base_power += contest.absorbed;
        }

        if let Some(stun) = effect.and_then(|e| e.stun) {
            let connected = contest.damage > 0 || contest.absorbed > 0;
            if !contest.dodged && connected && rng.roll(stun_seed, stun.chance) {
                let duration = if stun.duration == 0 {
                    config.default_stun_duration
                } else {
                    stun.duration
                };
                defender.status.stun.turns_remaining = duration;
                contest.flags |= OutcomeFlags::STUN_APPLIED;
            }
        }

        if defense != DefenseKind::Nothing && defender.status.charge.take().is_some() {
            contest.flags |= OutcomeFlags::CHARGE_CLEARED;
        }
        if defender.is_defeated() {
            contest.flags |= OutcomeFlags::DEFEATED;
        }
        if pending.critical {
            contest.flags |= OutcomeFlags::CRITICAL;
        }
        if pending.extra_move {
            contest.flags |= OutcomeFlags::EXTRA_MOVE;
        }
        if piercing {
            contest.flags |= OutcomeFlags::PIERCING;
        }
        if !broken.is_empty() {
            contest.flags |= OutcomeFlags::ARMOR_BROKEN;
        }

        let mut entry = LogEntry::new(turn, LogKind::Attack).with_move(attack);
        if let Some(attacker) = state.fighter(pending.attacker) {
            entry = entry.with_actor(attacker);
        }
        if let Some(defender) = state.fighter(self.defender) {
            entry = entry.with_target(defender);
        }
        entry.defense = Some(defense_def.name.clone());
        entry.damage = contest.damage;
        entry.self_damage = pending.self_damage;
        entry.absorbed = contest.absorbed;
        entry.reflected = contest.reflected;
        entry.armor_absorbed = armor_absorbed;
        entry.block = contest.block;
        entry.dodge_chance = contest.dodge_chance;
        entry.charge_level = pending.charge_level;
        entry.flags = contest.flags;
        if !broken.is_empty() {
            entry.note = Some(format!("{} destroyed", broken.join(", ")));
        }
        state.push_log(entry);

        state.refresh_outcome();
        state.tick_cooldowns();
        if let Some(attacker) = state.fighter_mut(pending.attacker) {
            set_cooldown(attacker, attack);
        }
        state.pending = None;
        state.finish_turn();

        if let Some(defender) = state.fighter_mut(self.defender) {
            defender.status.toggles.consume_grant(self.move_id);
        }
        Ok(landed)
    }
}
