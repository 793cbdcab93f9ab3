//! Scripted bouts: a RON list of referee steps replayed against a session.
//!
//! Scripts name moves by their catalog name and fighters by their 1-based
//! slot, the way a referee would call them. Steps are resolved against the
//! session's catalog and roster before they are submitted.

use std::path::Path;

use arena_core::{
    AttackCommand, Command, DefendCommand, FighterId, MoveId, MoveOracle, RefereeCommand,
    SkipCommand, SurrenderCommand, SurrenderResponse,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::{Result, RuntimeError, ScriptError};
use crate::session::Session;

/// A scripted bout: optional seed plus ordered steps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoutScript {
    pub seed: Option<u64>,
    pub steps: Vec<BoutStep>,
}

/// One referee call. Fighters are 1-based slots, moves are catalog names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BoutStep {
    Attack {
        actor: u8,
        target: u8,
        #[serde(rename = "move")]
        move_name: String,
    },
    Charge {
        actor: u8,
        #[serde(rename = "move")]
        move_name: String,
    },
    Toggle {
        actor: u8,
        #[serde(rename = "move")]
        move_name: String,
    },
    Defend {
        defender: u8,
        #[serde(rename = "move")]
        move_name: String,
    },
    Surrender {
        actor: u8,
    },
    Respond {
        accept: bool,
    },
    Skip,
    Rollback {
        turn: u32,
    },
    Reset,
    AdjustDamageBias {
        percent: i32,
    },
    AdjustPower {
        fighter: u8,
        current: u64,
        max: u64,
    },
    ToggleAutoSkip {
        fighter: u8,
    },
}

/// A step after name and slot resolution.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedStep {
    Command(Command),
    Rollback(u32),
    Reset,
}

/// What happened while a script was played.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoutReport {
    pub applied: usize,
    /// Step index and rejection message.
    pub rejected: Vec<(usize, String)>,
    /// Rendered log of the whole match after the last step.
    pub lines: Vec<String>,
}

impl BoutScript {
    pub fn load(path: &Path) -> std::result::Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> std::result::Result<Self, ScriptError> {
        ron::from_str(content).map_err(|e| ScriptError::Parse(e.to_string()))
    }

    /// Resolves every step against `session` without applying any of them.
    pub fn resolve(
        &self,
        session: &Session,
    ) -> std::result::Result<Vec<ResolvedStep>, ScriptError> {
        self.steps
            .iter()
            .enumerate()
            .map(|(step, s)| s.resolve(step, session))
            .collect()
    }
}

impl BoutStep {
    pub fn resolve(
        &self,
        step: usize,
        session: &Session,
    ) -> std::result::Result<ResolvedStep, ScriptError> {
        let fighter = |slot: u8| resolve_fighter(step, slot, session);
        let move_id = |name: &str| resolve_move(step, name, session);

        let command: Command = match self {
            Self::Attack {
                actor,
                target,
                move_name,
            } => AttackCommand::use_move(
                fighter(*actor)?,
                fighter(*target)?,
                move_id(move_name.as_str())?,
            )
            .into(),
            Self::Charge { actor, move_name } => {
                AttackCommand::charge(fighter(*actor)?, move_id(move_name.as_str())?).into()
            }
            Self::Toggle { actor, move_name } => {
                AttackCommand::toggle(fighter(*actor)?, move_id(move_name.as_str())?).into()
            }
            Self::Defend {
                defender,
                move_name,
            } => DefendCommand::new(fighter(*defender)?, move_id(move_name.as_str())?).into(),
            Self::Surrender { actor } => SurrenderCommand::new(fighter(*actor)?).into(),
            Self::Respond { accept } => SurrenderResponse { accept: *accept }.into(),
            Self::Skip => SkipCommand.into(),
            Self::Rollback { turn } => return Ok(ResolvedStep::Rollback(*turn)),
            Self::Reset => return Ok(ResolvedStep::Reset),
            Self::AdjustDamageBias { percent } => {
                RefereeCommand::AdjustDamageBias { percent: *percent }.into()
            }
            Self::AdjustPower {
                fighter: slot,
                current,
                max,
            } => RefereeCommand::AdjustPowerLevels {
                fighter: fighter(*slot)?,
                current: *current,
                max: *max,
            }
            .into(),
            Self::ToggleAutoSkip { fighter: slot } => RefereeCommand::ToggleAutoSkip {
                fighter: fighter(*slot)?,
            }
            .into(),
        };
        Ok(ResolvedStep::Command(command))
    }
}

fn resolve_fighter(
    step: usize,
    slot: u8,
    session: &Session,
) -> std::result::Result<FighterId, ScriptError> {
    let id = slot
        .checked_sub(1)
        .map(FighterId)
        .filter(|id| session.state().roster.contains(*id));
    id.ok_or(ScriptError::UnknownFighter {
        step,
        fighter: slot,
    })
}

fn resolve_move(
    step: usize,
    name: &str,
    session: &Session,
) -> std::result::Result<MoveId, ScriptError> {
    session
        .oracles()
        .catalog()
        .lookup(name)
        .ok_or_else(|| ScriptError::UnknownMove {
            step,
            name: name.to_string(),
        })
}

/// Plays `script` against `session`.
///
/// Steps that fail to resolve abort the bout. Rejected commands are recorded
/// and, unless `stop_on_rejection` is set, the bout carries on.
pub fn play(
    session: &mut Session,
    script: &BoutScript,
    stop_on_rejection: bool,
) -> Result<BoutReport> {
    let steps = script.resolve(session)?;
    let mut report = BoutReport::default();

    for (index, step) in steps.into_iter().enumerate() {
        let outcome = match step {
            ResolvedStep::Command(command) => session.submit(command),
            ResolvedStep::Rollback(turn) => session.rollback_to(turn),
            ResolvedStep::Reset => session.reset(),
        };
        match outcome {
            Ok(_) => report.applied += 1,
            Err(e @ RuntimeError::ObserverFailed { .. }) => return Err(e),
            Err(e) => {
                debug!(target: "runtime::scenario", step = index, error = %e, "Step rejected");
                report.rejected.push((index, e.to_string()));
                if stop_on_rejection {
                    break;
                }
            }
        }
    }

    report.lines = session.transcript();
    info!(
        target: "runtime::scenario",
        applied = report.applied,
        rejected = report.rejected.len(),
        game_over = session.state().is_game_over(),
        "Bout finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_steps() {
        let script = BoutScript::parse(
            r#"(
                seed: Some(7),
                steps: [
                    Attack(actor: 1, target: 2, move: "Punch"),
                    Defend(defender: 2, move: "Block"),
                    Skip,
                    Rollback(turn: 1),
                ],
            )"#,
        )
        .expect("script parses");

        assert_eq!(script.seed, Some(7));
        assert_eq!(script.steps.len(), 4);
        assert_eq!(
            script.steps[0],
            BoutStep::Attack {
                actor: 1,
                target: 2,
                move_name: "Punch".to_string(),
            }
        );
        assert_eq!(script.steps[2], BoutStep::Skip);
    }

    #[test]
    fn malformed_script_is_a_parse_error() {
        assert!(matches!(
            BoutScript::parse("(steps: [Punch])"),
            Err(ScriptError::Parse(_))
        ));
    }

    #[test]
    fn resolution_checks_names_and_slots() {
        let session = Session::standard(1).expect("standard session");

        let unknown_move = BoutStep::Attack {
            actor: 1,
            target: 2,
            move_name: "Spirit Bomb".to_string(),
        };
        assert!(matches!(
            unknown_move.resolve(3, &session),
            Err(ScriptError::UnknownMove { step: 3, .. })
        ));

        let slot_zero = BoutStep::Surrender { actor: 0 };
        assert!(matches!(
            slot_zero.resolve(0, &session),
            Err(ScriptError::UnknownFighter { fighter: 0, .. })
        ));

        let resolved = BoutStep::Surrender { actor: 2 }
            .resolve(0, &session)
            .expect("slot 2 exists");
        assert_eq!(
            resolved,
            ResolvedStep::Command(SurrenderCommand::new(FighterId(1)).into())
        );
    }
}
