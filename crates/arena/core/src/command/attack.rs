//! Attack pipeline: one move, one intent, one target.
//!
//! Resolution order:
//! 1. skip interception (defeated / auto-skip / stunned actors pass the turn)
//! 2. a charge on a different move is discarded
//! 3. specials (channel, transform, skip, heal, surrender) resolve and end the turn
//! 4. toggles flip and return without ending the turn
//! 5. `charge` intent accumulates a level and ends the turn
//! 6. `use` intent computes damage and either parks a [`PendingDefense`] or
//!    resolves as a no-contest exchange
//!
//! Granted-move counters for the submitted move are spent on every path.

use super::specials::{self, set_cooldown, tick_channeling};
use super::skip::{intercept, skip_reason};
use super::surrender;
use super::{CommandTransition, Intent, SequenceError, ensure_actor_turn};
use crate::combat::{
    ToggleModifiers, apply_adjust, apply_bias, base_damage, charged_percent, critical_bonus,
    percent_of,
};
use crate::env::{CombatEnv, MoveDefinition, MoveId, OracleError, RngOracle, RollContext};
use crate::error::{CombatError, ErrorKind, ErrorSeverity};
use crate::state::{
    ActiveToggle, ChargedMove, CombatState, Fighter, FighterId, LogEntry, LogKind, OutcomeFlags,
    Pending, PendingDefense, SkipReason, ToggleChange,
};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackCommand {
    pub actor: FighterId,
    pub target: FighterId,
    pub move_id: MoveId,
    pub intent: Intent,
}

impl AttackCommand {
    pub fn new(actor: FighterId, target: FighterId, move_id: MoveId, intent: Intent) -> Self {
        Self {
            actor,
            target,
            move_id,
            intent,
        }
    }

    pub fn use_move(actor: FighterId, target: FighterId, move_id: MoveId) -> Self {
        Self::new(actor, target, move_id, Intent::Use)
    }

    pub fn charge(actor: FighterId, move_id: MoveId) -> Self {
        Self::new(actor, actor, move_id, Intent::Charge)
    }

    pub fn toggle(actor: FighterId, move_id: MoveId) -> Self {
        Self::new(actor, actor, move_id, Intent::Toggle)
    }
}

/// How an accepted attack command ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackResolution {
    /// The actor could not act; the move was not processed.
    Skipped(SkipReason),
    /// Resolved on the spot.
    Completed,
    /// A defense must be chosen before anything else happens.
    AwaitingDefense,
    /// Surrender handshake started.
    AwaitingSurrenderResponse,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AttackError {
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error("fighter slot {0} has no backing record")]
    UnknownActor(FighterId),

    #[error("target slot {0} has no backing record")]
    UnknownTarget(FighterId),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("{actor} neither owns nor was granted {move_id}")]
    MoveNotOwned { actor: FighterId, move_id: MoveId },

    #[error("{move_id} is on cooldown for {remaining} more exchange(s)")]
    OnCooldown { move_id: MoveId, remaining: u32 },

    #[error("{0} is out of ammo")]
    OutOfAmmo(MoveId),

    #[error("{0} has no charges left")]
    NoItemCharges(MoveId),

    #[error("{move_id} cannot be used with intent '{intent}'")]
    IntentMismatch { move_id: MoveId, intent: Intent },

    #[error("{0} has too many active toggles")]
    TooManyToggles(FighterId),
}

impl CombatError for AttackError {
    fn severity(&self) -> ErrorSeverity {
        use AttackError::*;
        match self {
            Sequence(_) | OnCooldown { .. } => ErrorSeverity::Recoverable,
            Oracle(inner) => inner.severity(),
            UnknownActor(_)
            | UnknownTarget(_)
            | MoveNotOwned { .. }
            | OutOfAmmo(_)
            | NoItemCharges(_)
            | IntentMismatch { .. }
            | TooManyToggles(_) => ErrorSeverity::Validation,
        }
    }

    fn kind(&self) -> ErrorKind {
        use AttackError::*;
        match self {
            Sequence(_) => ErrorKind::InvalidCommandSequence,
            UnknownActor(_) | UnknownTarget(_) => ErrorKind::UnknownCombatantReference,
            Oracle(inner) => inner.kind(),
            MoveNotOwned { .. }
            | OnCooldown { .. }
            | OutOfAmmo(_)
            | NoItemCharges(_)
            | IntentMismatch { .. }
            | TooManyToggles(_) => ErrorKind::UnavailableMove,
        }
    }

    fn error_code(&self) -> &'static str {
        use AttackError::*;
        match self {
            Sequence(inner) => inner.error_code(),
            UnknownActor(_) => "ATTACK_UNKNOWN_ACTOR",
            UnknownTarget(_) => "ATTACK_UNKNOWN_TARGET",
            Oracle(inner) => inner.error_code(),
            MoveNotOwned { .. } => "ATTACK_MOVE_NOT_OWNED",
            OnCooldown { .. } => "ATTACK_ON_COOLDOWN",
            OutOfAmmo(_) => "ATTACK_OUT_OF_AMMO",
            NoItemCharges(_) => "ATTACK_NO_ITEM_CHARGES",
            IntentMismatch { .. } => "ATTACK_INTENT_MISMATCH",
            TooManyToggles(_) => "ATTACK_TOO_MANY_TOGGLES",
        }
    }
}

impl AttackCommand {
    fn check_available(&self, fighter: &Fighter, def: &MoveDefinition) -> Result<(), AttackError> {
        let move_id = self.move_id;
        if !fighter.owns(move_id) && fighter.status.toggles.granted_uses(move_id) == 0 {
            return Err(AttackError::MoveNotOwned {
                actor: fighter.id,
                move_id,
            });
        }

        let remaining = fighter.cooldown(move_id);
        if remaining > 0 && !def.is_surrender() {
            return Err(AttackError::OnCooldown { move_id, remaining });
        }

        if def.ammo().is_some() && fighter.ammo.get(&move_id).copied().unwrap_or(0) == 0 {
            return Err(AttackError::OutOfAmmo(move_id));
        }

        if def.consumes_item_charge() && fighter.item_uses.get(&move_id).copied().unwrap_or(0) == 0
        {
            return Err(AttackError::NoItemCharges(move_id));
        }

        // toggles flip whatever the intent
        let mismatch = !def.is_toggle()
            && match self.intent {
                Intent::Use => false,
                Intent::Toggle => true,
                Intent::Charge => def.charge().is_none(),
            };
        if mismatch {
            return Err(AttackError::IntentMismatch {
                move_id,
                intent: self.intent,
            });
        }

        if def.is_toggle()
            && !fighter.status.toggles.contains(move_id)
            && fighter.status.toggles.is_full()
        {
            return Err(AttackError::TooManyToggles(fighter.id));
        }
        Ok(())
    }

    fn resolve_toggle(
        &self,
        state: &mut CombatState,
        def: &MoveDefinition,
    ) -> Result<(), AttackError> {
        let turn = state.turn.number;
        let fighter = state
            .fighter_mut(self.actor)
            .ok_or(AttackError::UnknownActor(self.actor))?;

        let change = if fighter.status.toggles.remove(def.id).is_some() {
            ToggleChange::Deactivated
        } else if fighter.status.toggles.insert(ActiveToggle::activate(def)) {
            ToggleChange::Activated
        } else {
            return Err(AttackError::TooManyToggles(self.actor));
        };

        let mut entry = LogEntry::about(turn, LogKind::Toggle, fighter).with_move(def);
        entry.toggle = Some(change);
        if let Some(note) = def.toggle().and_then(|t| t.note.as_ref()) {
            entry.note = Some(format!("{change}: {note}"));
        }
        state.push_log(entry);
        Ok(())
    }

    fn resolve_charge(
        &self,
        state: &mut CombatState,
        def: &MoveDefinition,
        max_level: u32,
    ) -> Result<(), AttackError> {
        let turn = state.turn.number;
        let fighter = state
            .fighter_mut(self.actor)
            .ok_or(AttackError::UnknownActor(self.actor))?;

        let level = match fighter.status.charge {
            Some(charge) if charge.move_id == def.id => (charge.level + 1).min(max_level),
            _ => 1,
        };
        fighter.status.charge = Some(ChargedMove {
            move_id: def.id,
            level,
        });

        let self_damage = def
            .self_damage()
            .map_or(0, |s| percent_of(fighter.power, s.percent));
        fighter.take_damage(self_damage);

        let mut entry = LogEntry::about(turn, LogKind::Charge, fighter).with_move(def);
        entry.self_damage = self_damage;
        entry.charge_level = Some(level);
        entry.charge_max = Some(max_level);
        state.push_log(entry);

        tick_channeling(state, self.actor);
        state.refresh_outcome();
        state.finish_turn();
        Ok(())
    }

    fn resolve_use(
        &self,
        state: &mut CombatState,
        env: &CombatEnv<'_>,
        def: &MoveDefinition,
    ) -> Result<AttackResolution, AttackError> {
        let catalog = env.moves()?;
        let rng: &dyn RngOracle = env.rng()?;
        let crit_seed = state.roll_seed(self.actor, RollContext::Critical);
        let extra_seed = state.roll_seed(self.actor, RollContext::ExtraMove);
        let bias = std::mem::take(&mut state.damage_bias);

        let fighter = state
            .fighter_mut(self.actor)
            .ok_or(AttackError::UnknownActor(self.actor))?;

        let mut percent = def.damage().map_or(0.0, |d| d.base_percent());
        let mut charge_level = None;
        if let Some(charge) = fighter.status.charge.filter(|c| c.move_id == def.id) {
            percent = charged_percent(percent, charge.level);
            charge_level = Some(charge.level);
            fighter.status.charge = None;
        }
        percent += ToggleModifiers::damage_boost(fighter, def.id, catalog);
        let modifiers = ToggleModifiers::collect(fighter, catalog);

        let mut damage = 0;
        let mut critical = false;
        let mut extra_move = false;
        if let Some(effect) = def.damage() {
            let basis = if fighter.race.uses_max_power_basis() {
                fighter.max_power
            } else {
                fighter.power
            };
            damage = base_damage(effect, basis, percent);
            damage = apply_adjust(damage, modifiers.total_damage_adjust);
            damage = apply_bias(damage, bias);

            if let Some(crit) = effect.critical {
                if rng.roll(crit_seed, crit.chance) {
                    critical = true;
                    damage += critical_bonus(damage, crit.increase);
                }
            }
            extra_move = rng.roll(extra_seed, effect.extra_move_chance);
        }

        let self_damage = def
            .self_damage()
            .map_or(0, |s| percent_of(fighter.power, s.percent));
        fighter.take_damage(self_damage);

        if let Some(ammo) = fighter.ammo.get_mut(&def.id) {
            *ammo = ammo.saturating_sub(1);
        }

        tick_channeling(state, self.actor);
        if extra_move {
            state.turn.extra_moves = 1;
        }

        if damage > 0 || self_damage > 0 || extra_move {
            state.pending = Some(Pending::Defense(PendingDefense {
                attacker: self.actor,
                defender: self.target,
                move_id: def.id,
                damage,
                critical,
                self_damage,
                extra_move,
                charge_level,
            }));
            return Ok(AttackResolution::AwaitingDefense);
        }

        let turn = state.turn.number;
        let mut entry = match state.fighter(self.actor) {
            Some(fighter) => LogEntry::about(turn, LogKind::NoContest, fighter),
            None => LogEntry::new(turn, LogKind::NoContest),
        };
        entry = entry.with_move(def);
        if let Some(target) = state.fighter(self.target) {
            entry = entry.with_target(target);
        }
        entry.charge_level = charge_level;
        if critical {
            entry.flags |= OutcomeFlags::CRITICAL;
        }
        state.push_log(entry);

        state.refresh_outcome();
        state.tick_cooldowns();
        if let Some(fighter) = state.fighter_mut(self.actor) {
            set_cooldown(fighter, def);
        }
        state.finish_turn();
        Ok(AttackResolution::Completed)
    }
}

impl CommandTransition for AttackCommand {
    type Error = AttackError;
    type Result = AttackResolution;

    fn pre_validate(&self, state: &CombatState, env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        let fighter = state
            .fighter(self.actor)
            .ok_or(AttackError::UnknownActor(self.actor))?;
        ensure_actor_turn(state, self.actor)?;
        if !state.roster.contains(self.target) {
            return Err(AttackError::UnknownTarget(self.target));
        }
        let def = env.definition(self.move_id)?;

        if skip_reason(fighter).is_some() {
            return Ok(());
        }
        self.check_available(fighter, def)
    }

    fn apply(
        &self,
        state: &mut CombatState,
        env: &CombatEnv<'_>,
    ) -> Result<Self::Result, Self::Error> {
        let def = env.definition(self.move_id)?;
        let rng: &dyn RngOracle = env.rng()?;
        let fighter = state
            .fighter(self.actor)
            .ok_or(AttackError::UnknownActor(self.actor))?;

        let resolution = if let Some(reason) = skip_reason(fighter) {
            intercept(state, self.actor, reason);
            AttackResolution::Skipped(reason)
        } else {
            self.resolve(state, env, rng, def)?
        };

        if let Some(fighter) = state.fighter_mut(self.actor) {
            fighter.status.toggles.consume_grant(def.id);
        }
        Ok(resolution)
    }

    fn post_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        if let Some(pending) = state.pending_defense() {
            if !state.roster.contains(pending.defender) {
                return Err(AttackError::UnknownTarget(pending.defender));
            }
        }
        Ok(())
    }
}

impl AttackCommand {
    fn resolve(
        &self,
        state: &mut CombatState,
        env: &CombatEnv<'_>,
        rng: &dyn RngOracle,
        def: &MoveDefinition,
    ) -> Result<AttackResolution, AttackError> {
        if let Some(fighter) = state.fighter_mut(self.actor) {
            if fighter.status.charge.is_some_and(|c| c.move_id != def.id) {
                fighter.status.charge = None;
            }
        }

        if let Some(effect) = def.channel() {
            specials::channel(state, self.actor, def, effect);
            return Ok(AttackResolution::Completed);
        }
        if let Some(effect) = def.transform() {
            specials::transform(state, rng, self.actor, self.target, def, effect);
            return Ok(AttackResolution::Completed);
        }
        if def.is_skip() {
            specials::skip_turn(state, self.actor, def);
            return Ok(AttackResolution::Completed);
        }
        if let Some(effect) = def.heal() {
            specials::heal(state, rng, self.actor, def, effect);
            return Ok(AttackResolution::Completed);
        }
        if def.is_surrender() {
            surrender::attempt(state, self.actor, Some(def));
            return Ok(AttackResolution::AwaitingSurrenderResponse);
        }

        if def.is_toggle() {
            self.resolve_toggle(state, def)?;
            return Ok(AttackResolution::Completed);
        }

        if self.intent == Intent::Charge {
            if let Some(charge) = def.charge() {
                self.resolve_charge(state, def, charge.max_level)?;
                return Ok(AttackResolution::Completed);
            }
        }

        self.resolve_use(state, env, def)
    }
}
