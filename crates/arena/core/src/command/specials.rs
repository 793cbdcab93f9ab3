//! Special moves that resolve on the spot and end the turn.

use crate::combat::{heal_amount, percent_of};
use crate::env::{
    ChannelEffect, HealEffect, MoveDefinition, RngOracle, RollContext, TransformEffect,
};
use crate::state::{
    Channeling, CombatState, EndReason, Fighter, FighterId, LogEntry, LogKind, MatchOutcome,
};

pub(super) fn set_cooldown(fighter: &mut Fighter, def: &MoveDefinition) {
    if def.cooldown > 0 {
        fighter.cooldowns.insert(def.id, def.cooldown);
    }
}

/// Counts an own attack against the actor's channeling window, logging the revert.
pub(super) fn tick_channeling(state: &mut CombatState, actor: FighterId) {
    let turn = state.turn.number;
    let Some(fighter) = state.fighter_mut(actor) else {
        return;
    };
    if let Some(expired) = fighter.tick_channeling() {
        let entry = LogEntry::about(turn, LogKind::ChannelEnd, fighter).with_note(format!(
            "channeling ended, power {} -> {}",
            expired.boosted, expired.after_effect
        ));
        state.push_log(entry);
    }
}

/// Full power now; reverts to a fraction of the starting power after `duration` own attacks.
pub(super) fn channel(
    state: &mut CombatState,
    actor: FighterId,
    def: &MoveDefinition,
    effect: &ChannelEffect,
) {
    let turn = state.turn.number;
    if let Some(fighter) = state.fighter_mut(actor) {
        let window = Channeling {
            initial: fighter.power,
            boosted: fighter.max_power,
            after_effect: percent_of(fighter.power, effect.after_effect_ratio),
            attacks_remaining: effect.duration,
        };
        fighter.power = window.boosted;
        fighter.status.channeling = Some(window);
        set_cooldown(fighter, def);

        let entry = LogEntry::about(turn, LogKind::ChannelStart, fighter)
            .with_move(def)
            .with_note(format!(
                "power {} -> {} for {} attacks",
                window.initial, window.boosted, window.attacks_remaining
            ));
        state.push_log(entry);
    }
    state.finish_turn();
}

/// One roll: backfire zeroes the actor and hands the match to `target`.
pub(super) fn transform(
    state: &mut CombatState,
    rng: &dyn RngOracle,
    actor: FighterId,
    target: FighterId,
    def: &MoveDefinition,
    effect: &TransformEffect,
) {
    let turn = state.turn.number;
    let seed = state.roll_seed(actor, RollContext::Transform);
    let backfired = rng.roll(seed, effect.death_penalty_chance);

    if let Some(fighter) = state.fighter_mut(actor) {
        set_cooldown(fighter, def);
        let entry = if backfired {
            fighter.power = 0;
            LogEntry::about(turn, LogKind::TransformBackfire, fighter)
                .with_move(def)
                .with_note(format!("{} failed, power reduced to 0", def.name))
        } else {
            let before = fighter.power;
            fighter.power = fighter.power.saturating_mul(effect.multiplier);
            LogEntry::about(turn, LogKind::Transform, fighter)
                .with_move(def)
                .with_note(format!(
                    "power {} -> {}, max power {}",
                    before, fighter.power, fighter.max_power
                ))
        };
        state.push_log(entry);
    }

    if backfired {
        state.outcome = MatchOutcome::finished(Some(target), EndReason::TransformationBacklash);
    }
    state.finish_turn();
}

/// Explicit "skip my turn" move.
pub(super) fn skip_turn(state: &mut CombatState, actor: FighterId, def: &MoveDefinition) {
    let turn = state.turn.number;
    if let Some(fighter) = state.fighter_mut(actor) {
        set_cooldown(fighter, def);
        let entry = LogEntry::about(turn, LogKind::Skip, fighter).with_move(def);
        state.push_log(entry);
    }
    tick_channeling(state, actor);
    state.pass_turn();
}

/// Chance-gated heal. Returns whether it landed.
///
/// Healing items spend a charge only when the heal lands; Ki heals are unlimited.
pub(super) fn heal(
    state: &mut CombatState,
    rng: &dyn RngOracle,
    actor: FighterId,
    def: &MoveDefinition,
    effect: &HealEffect,
) -> bool {
    let turn = state.turn.number;
    let success = rng.roll(state.roll_seed(actor, RollContext::Heal), effect.chance);
    let fraction = rng.uniform(
        state.roll_seed(actor, RollContext::HealAmount),
        effect.min,
        effect.max,
    );

    let Some(fighter) = state.fighter_mut(actor) else {
        return false;
    };
    set_cooldown(fighter, def);

    if !success {
        let entry = LogEntry::about(turn, LogKind::HealFailed, fighter).with_move(def);
        state.push_log(entry);
        state.pass_turn();
        return false;
    }

    let amount = heal_amount(fighter.power, fighter.max_power, fraction);
    fighter.power += amount;
    if def.consumes_item_charge() {
        if let Some(uses) = fighter.item_uses.get_mut(&def.id) {
            *uses = uses.saturating_sub(1);
        }
    }

    let mut entry = LogEntry::about(turn, LogKind::Heal, fighter).with_move(def);
    entry.heal = amount;
    state.push_log(entry);
    state.finish_turn();
    true
}
