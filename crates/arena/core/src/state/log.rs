//! Append-only combat log.
//!
//! Every accepted command appends at least one [`LogEntry`]. Entries are
//! plain data; `Display` renders the one-line text form used by the CLI and
//! the runtime exports.

use core::fmt;

use bitflags::bitflags;

use super::{Fighter, FighterId};
use crate::env::{MoveDefinition, MoveId};

bitflags! {
    /// Outcome markers attached to a log entry.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct OutcomeFlags: u16 {
        const CRITICAL       = 1 << 0;
        const PIERCING       = 1 << 1;
        const STUN_APPLIED   = 1 << 2;
        const EXTRA_MOVE     = 1 << 3;
        const DODGED         = 1 << 4;
        const BLOCKED        = 1 << 5;
        const REFLECTED      = 1 << 6;
        const ABSORBED       = 1 << 7;
        const ARMOR_BROKEN   = 1 << 8;
        const CHARGE_CLEARED = 1 << 9;
        const DEFEATED       = 1 << 10;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogKind {
    #[default]
    Attack,
    #[strum(to_string = "No Contest")]
    NoContest,
    Charge,
    Toggle,
    Heal,
    #[strum(to_string = "Heal Failed")]
    HealFailed,
    #[strum(to_string = "Channel Start")]
    ChannelStart,
    #[strum(to_string = "Channel End")]
    ChannelEnd,
    Transform,
    #[strum(to_string = "Transform Backfire")]
    TransformBackfire,
    Skip,
    #[strum(to_string = "Auto Skip")]
    AutoSkip,
    #[strum(to_string = "Stun Recovered")]
    StunRecovered,
    #[strum(to_string = "Surrender Attempt")]
    SurrenderAttempt,
    #[strum(to_string = "Surrender")]
    SurrenderResolved,
    #[strum(to_string = "Turn Rollback")]
    Rollback,
    Referee,
}

/// Why a turn was passed without resolving the submitted move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkipReason {
    Defeated,
    #[strum(to_string = "Auto Skip")]
    AutoSkip,
    Stunned,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockResult {
    Failed,
    #[strum(to_string = "partial")]
    Partial,
    #[strum(to_string = "full")]
    Full,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ToggleChange {
    Activated,
    Deactivated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SurrenderResult {
    Attempted,
    Accepted,
    Declined,
}

/// One resolved event.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    pub turn: u32,
    pub kind: LogKind,
    pub actor: Option<FighterId>,
    pub actor_name: String,
    pub target: Option<FighterId>,
    pub target_name: String,
    pub move_id: Option<MoveId>,
    pub move_name: String,
    /// Name of the defense move chosen against a contested attack.
    pub defense: Option<String>,
    /// Final damage dealt to the target.
    pub damage: u64,
    /// Power of the fighter the entry is about after it resolved.
    pub remaining_power: Option<u64>,
    pub flags: OutcomeFlags,
    pub self_damage: u64,
    pub heal: u64,
    pub absorbed: u64,
    pub reflected: u64,
    pub armor_absorbed: u64,
    pub block: Option<BlockResult>,
    pub dodge_chance: Option<f64>,
    pub charge_level: Option<u32>,
    pub charge_max: Option<u32>,
    pub toggle: Option<ToggleChange>,
    pub skip_reason: Option<SkipReason>,
    pub surrender: Option<SurrenderResult>,
    pub note: Option<String>,
}

impl LogEntry {
    pub fn new(turn: u32, kind: LogKind) -> Self {
        Self {
            turn,
            kind,
            ..Self::default()
        }
    }

    /// Entry about `fighter`, recording its power after the event.
    pub fn about(turn: u32, kind: LogKind, fighter: &Fighter) -> Self {
        Self::new(turn, kind).with_actor(fighter)
    }

    #[must_use]
    pub fn with_actor(mut self, fighter: &Fighter) -> Self {
        self.actor = Some(fighter.id);
        self.actor_name = fighter.name.clone();
        self.remaining_power = Some(fighter.power);
        self
    }

    #[must_use]
    pub fn with_target(mut self, fighter: &Fighter) -> Self {
        self.target = Some(fighter.id);
        self.target_name = fighter.name.clone();
        self.remaining_power = Some(fighter.power);
        self
    }

    #[must_use]
    pub fn with_move(mut self, def: &MoveDefinition) -> Self {
        self.move_id = Some(def.id);
        self.move_name = def.name.clone();
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: OutcomeFlags) -> Self {
        self.flags |= flags;
        self
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Turn {} [{}]", self.turn, self.kind)?;
        if !self.actor_name.is_empty() {
            write!(f, " {}", self.actor_name)?;
        }
        if !self.move_name.is_empty() {
            write!(f, " {}", self.move_name)?;
        }
        if !self.target_name.is_empty() {
            write!(f, " -> {}", self.target_name)?;
        }
        if let Some(defense) = &self.defense {
            write!(f, " vs {defense}")?;
            if let Some(block) = self.block {
                write!(f, " ({block})")?;
            }
        }

        match self.kind {
            LogKind::Attack | LogKind::NoContest => write!(f, ": {} damage", self.damage)?,
            LogKind::Heal => write!(f, ": healed {}", self.heal)?,
            LogKind::Charge => {
                if let (Some(level), Some(max)) = (self.charge_level, self.charge_max) {
                    write!(f, ": charge {level}/{max}")?;
                }
            }
            LogKind::Toggle => {
                if let Some(change) = self.toggle {
                    write!(f, ": {change}")?;
                }
            }
            LogKind::Skip | LogKind::AutoSkip => {
                if let Some(reason) = self.skip_reason {
                    write!(f, ": {reason}")?;
                }
            }
            LogKind::SurrenderAttempt | LogKind::SurrenderResolved => {
                if let Some(result) = self.surrender {
                    write!(f, ": {result}")?;
                }
            }
            _ => {}
        }

        let details = [
            (self.self_damage, "self"),
            (self.reflected, "reflected"),
            (self.absorbed, "absorbed"),
            (self.armor_absorbed, "armor"),
        ];
        for (amount, label) in details {
            if amount > 0 {
                write!(f, ", {label} {amount}")?;
            }
        }

        let markers = [
            (OutcomeFlags::CRITICAL, "critical"),
            (OutcomeFlags::PIERCING, "piercing"),
            (OutcomeFlags::DODGED, "dodged"),
            (OutcomeFlags::REFLECTED, "reflected"),
            (OutcomeFlags::ABSORBED, "absorbed"),
            (OutcomeFlags::STUN_APPLIED, "stunned"),
            (OutcomeFlags::EXTRA_MOVE, "extra move"),
            (OutcomeFlags::ARMOR_BROKEN, "armor broken"),
            (OutcomeFlags::CHARGE_CLEARED, "charge lost"),
            (OutcomeFlags::DEFEATED, "defeated"),
        ];
        let mut first = true;
        for (flag, label) in markers {
            if self.flags.contains(flag) {
                f.write_str(if first { " [" } else { ", " })?;
                f.write_str(label)?;
                first = false;
            }
        }
        if !first {
            f.write_str("]")?;
        }

        if let Some(power) = self.remaining_power {
            write!(f, " (power {power})")?;
        }
        if let Some(note) = &self.note {
            write!(f, " - {note}")?;
        }
        Ok(())
    }
}

/// Ordered sequence of entries.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CombatLog {
    entries: Vec<LogEntry>,
}

impl CombatLog {
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries appended after the first `start`.
    pub fn since(&self, start: usize) -> &[LogEntry] {
        self.entries.get(start..).unwrap_or(&[])
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_attack_line() {
        let mut entry = LogEntry::new(3, LogKind::Attack);
        entry.actor_name = "Fighter 1".into();
        entry.target_name = "Fighter 2".into();
        entry.move_name = "Punch".into();
        entry.defense = Some("Block".into());
        entry.block = Some(BlockResult::Partial);
        entry.damage = 22;
        entry.remaining_power = Some(978);
        entry.flags = OutcomeFlags::CRITICAL | OutcomeFlags::STUN_APPLIED;

        assert_eq!(
            entry.to_string(),
            "Turn 3 [Attack] Fighter 1 Punch -> Fighter 2 vs Block (partial): 22 damage \
             [critical, stunned] (power 978)"
        );
    }

    #[test]
    fn renders_skip_reason() {
        let mut entry = LogEntry::new(1, LogKind::AutoSkip);
        entry.actor_name = "Fighter 4".into();
        entry.skip_reason = Some(SkipReason::AutoSkip);
        assert_eq!(entry.to_string(), "Turn 1 [Auto Skip] Fighter 4: Auto Skip");
    }

    #[test]
    fn since_is_empty_past_the_end() {
        let mut log = CombatLog::default();
        log.push(LogEntry::new(1, LogKind::Skip));
        assert_eq!(log.since(0).len(), 1);
        assert!(log.since(5).is_empty());
    }
}
