//! Referee overrides: direct edits outside the turn order.

use super::CommandTransition;
use crate::env::{CombatEnv, MoveId, OracleError};
use crate::error::{CombatError, ErrorKind, ErrorSeverity};
use crate::state::{CombatState, Fighter, FighterConfig, FighterId, LogEntry, LogKind};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RefereeCommand {
    /// Sets max power and current power (clamped to the new max).
    AdjustPowerLevels {
        fighter: FighterId,
        current: u64,
        max: u64,
    },
    /// One-shot damage adjustment in percent for the next attack.
    AdjustDamageBias { percent: i32 },
    ToggleAutoSkip { fighter: FighterId },
    /// Sets an active armor's durability, clamped to its maximum. Zero removes it.
    AdjustArmorHealth {
        fighter: FighterId,
        armor: MoveId,
        value: u64,
    },
    /// Replaces a fighter's definition and rebuilds it in place.
    UpdateCombatant {
        fighter: FighterId,
        config: FighterConfig,
    },
}

impl RefereeCommand {
    fn fighter(&self) -> Option<FighterId> {
        match self {
            Self::AdjustPowerLevels { fighter, .. }
            | Self::ToggleAutoSkip { fighter }
            | Self::AdjustArmorHealth { fighter, .. }
            | Self::UpdateCombatant { fighter, .. } => Some(*fighter),
            Self::AdjustDamageBias { .. } => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RefereeError {
    #[error("fighter slot {0} has no backing record")]
    UnknownFighter(FighterId),

    #[error("{0} is not an armor")]
    NotArmor(MoveId),

    #[error("{armor} is not active on {fighter}")]
    ArmorNotActive { fighter: FighterId, armor: MoveId },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl CombatError for RefereeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownFighter(_) | Self::NotArmor(_) | Self::ArmorNotActive { .. } => {
                ErrorSeverity::Validation
            }
            Self::Oracle(inner) => inner.severity(),
        }
    }

    fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownFighter(_) => ErrorKind::UnknownCombatantReference,
            Self::NotArmor(_) | Self::ArmorNotActive { .. } => ErrorKind::UnavailableMove,
            Self::Oracle(inner) => inner.kind(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownFighter(_) => "REFEREE_UNKNOWN_FIGHTER",
            Self::NotArmor(_) => "REFEREE_NOT_ARMOR",
            Self::ArmorNotActive { .. } => "REFEREE_ARMOR_NOT_ACTIVE",
            Self::Oracle(inner) => inner.error_code(),
        }
    }
}

fn referee_entry(turn: u32, fighter: Option<&Fighter>, note: String) -> LogEntry {
    let mut entry = LogEntry::new(turn, LogKind::Referee);
    if let Some(fighter) = fighter {
        entry = entry.with_actor(fighter);
    }
    entry.with_note(note)
}

impl CommandTransition for RefereeCommand {
    type Error = RefereeError;
    type Result = ();

    fn pre_validate(&self, state: &CombatState, env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        if let Some(id) = self.fighter() {
            if !state.roster.contains(id) {
                return Err(RefereeError::UnknownFighter(id));
            }
        }
        match self {
            Self::AdjustArmorHealth { fighter, armor, .. } => {
                if env.definition(*armor)?.armor().is_none() {
                    return Err(RefereeError::NotArmor(*armor));
                }
                let active = state
                    .fighter(*fighter)
                    .is_some_and(|f| f.status.toggles.contains(*armor));
                if !active {
                    return Err(RefereeError::ArmorNotActive {
                        fighter: *fighter,
                        armor: *armor,
                    });
                }
            }
            Self::UpdateCombatant { config, .. } => {
                for &id in config.moves.iter().chain(config.item_uses.keys()) {
                    env.definition(id)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn apply(&self, state: &mut CombatState, env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        let turn = state.turn.number;
        match self {
            Self::AdjustPowerLevels {
                fighter,
                current,
                max,
            } => {
                let f = state
                    .fighter_mut(*fighter)
                    .ok_or(RefereeError::UnknownFighter(*fighter))?;
                f.max_power = *max;
                f.power = (*current).min(*max);
                let note = format!("power set to {} / {}", f.power, f.max_power);
                let entry = referee_entry(turn, Some(&*f), note);
                state.push_log(entry);
            }
            Self::AdjustDamageBias { percent } => {
                state.damage_bias = *percent;
                state.push_log(referee_entry(
                    turn,
                    None,
                    format!("damage bias set to {percent}%"),
                ));
            }
            Self::ToggleAutoSkip { fighter } => {
                let f = state
                    .fighter_mut(*fighter)
                    .ok_or(RefereeError::UnknownFighter(*fighter))?;
                f.auto_skip = !f.auto_skip;
                f.config.auto_skip = f.auto_skip;
                let note = format!("auto skip {}", if f.auto_skip { "on" } else { "off" });
                let entry = referee_entry(turn, Some(&*f), note);
                state.push_log(entry);
            }
            Self::AdjustArmorHealth {
                fighter,
                armor,
                value,
            } => {
                let armor_name = env.definition(*armor)?.name.clone();
                let f = state
                    .fighter_mut(*fighter)
                    .ok_or(RefereeError::UnknownFighter(*fighter))?;
                let toggle = f
                    .status
                    .toggles
                    .get_mut(*armor)
                    .ok_or(RefereeError::ArmorNotActive {
                        fighter: *fighter,
                        armor: *armor,
                    })?;
                let max = toggle.max_durability.unwrap_or(0);
                let durability = (*value).min(max);
                toggle.durability = Some(durability);
                if durability == 0 {
                    f.status.toggles.remove(*armor);
                }
                let note = format!("{armor_name} durability set to {durability}");
                let entry = referee_entry(turn, Some(&*f), note);
                state.push_log(entry);
            }
            Self::UpdateCombatant { fighter, config } => {
                let catalog = env.moves()?;
                let f = state
                    .fighter_mut(*fighter)
                    .ok_or(RefereeError::UnknownFighter(*fighter))?;
                *f = Fighter::build(*fighter, config.clone(), catalog);
                let note = format!("{} reconfigured", f.name);
                let entry = referee_entry(turn, Some(&*f), note);
                state.push_log(entry);
            }
        }
        Ok(())
    }
}
