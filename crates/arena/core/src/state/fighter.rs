//! Combatant records and the configuration they are built from.

use std::collections::BTreeMap;

use core::fmt;

use crate::env::{MoveId, MoveOracle};

use super::status::FighterStatus;

/// Rotation slot of a combatant (0-based, at most `CombatConfig::MAX_COMBATANTS`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FighterId(pub u8);

impl FighterId {
    #[inline]
    pub const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FighterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fighter{}", self.0 + 1)
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
pub enum Race {
    Saiyan,
    #[default]
    Human,
    /// Never runs low on energy: damage is computed from max power.
    #[strum(serialize = "Infinite Ki Android")]
    InfiniteKiAndroid,
    Duugo,
}

impl Race {
    pub const fn uses_max_power_basis(self) -> bool {
        matches!(self, Race::InfiniteKiAndroid)
    }
}

/// Weighted-choice AI parameters. Carried as data; no policy consumes it here.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AiProfile {
    pub basic_weight: f64,
    pub defense_weight: f64,
    pub special_weight: f64,
    pub item_weight: f64,
    pub other_weight: f64,
    /// Fraction of max power below which surrender is considered.
    pub surrender_threshold: f64,
    pub surrender_chance: f64,
    pub accept_surrender_chance: f64,
    pub toggle_activation_chance: f64,
}

impl AiProfile {
    pub fn balanced() -> Self {
        Self {
            basic_weight: 0.35,
            defense_weight: 0.1,
            special_weight: 0.35,
            item_weight: 0.1,
            other_weight: 0.1,
            surrender_threshold: 0.3,
            surrender_chance: 0.45,
            accept_surrender_chance: 0.87,
            toggle_activation_chance: 0.2,
        }
    }
}

impl Default for AiProfile {
    fn default() -> Self {
        Self::balanced()
    }
}

/// Definition a combatant is (re)built from on match start, reset and config update.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FighterConfig {
    pub name: String,
    pub race: Race,
    pub base_power: u64,
    pub current_power: u64,
    pub moves: Vec<MoveId>,
    /// Charges for non-Ki healing items; owned items default to one charge.
    pub item_uses: BTreeMap<MoveId, u32>,
    pub ai: Option<AiProfile>,
    pub auto_skip: bool,
}

impl FighterConfig {
    pub fn new(name: impl Into<String>, race: Race, power: u64) -> Self {
        Self {
            name: name.into(),
            race,
            base_power: power,
            current_power: power,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_moves(mut self, moves: impl IntoIterator<Item = MoveId>) -> Self {
        self.moves = moves.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_auto_skip(mut self, auto_skip: bool) -> Self {
        self.auto_skip = auto_skip;
        self
    }
}

/// Mutable per-combatant record.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fighter {
    pub id: FighterId,
    /// Source definition, kept so reset can rebuild the fighter.
    pub config: FighterConfig,
    pub name: String,
    pub race: Race,
    /// Current power: hit points and attack fuel at once. May exceed `max_power`.
    pub power: u64,
    pub max_power: u64,
    pub moves: Vec<MoveId>,
    pub cooldowns: BTreeMap<MoveId, u32>,
    pub ammo: BTreeMap<MoveId, u32>,
    pub item_uses: BTreeMap<MoveId, u32>,
    pub auto_skip: bool,
    pub status: FighterStatus,
}

impl Fighter {
    /// Builds a fresh fighter, filling magazines and item charges for owned moves.
    pub fn build<M>(id: FighterId, config: FighterConfig, catalog: &M) -> Self
    where
        M: MoveOracle + ?Sized,
    {
        let mut ammo = BTreeMap::new();
        let mut item_uses = BTreeMap::new();

        for &move_id in &config.moves {
            let Some(def) = catalog.definition(move_id) else {
                continue;
            };
            if let Some(magazine) = def.ammo() {
                ammo.insert(move_id, magazine.magazine);
            }
            if def.consumes_item_charge() {
                let uses = config.item_uses.get(&move_id).copied().unwrap_or(1);
                item_uses.insert(move_id, uses);
            }
        }

        Self {
            id,
            name: config.name.clone(),
            race: config.race,
            power: config.current_power,
            max_power: config.base_power,
            moves: config.moves.clone(),
            cooldowns: BTreeMap::new(),
            ammo,
            item_uses,
            auto_skip: config.auto_skip,
            status: FighterStatus::default(),
            config,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.power == 0
    }

    pub fn is_stunned(&self) -> bool {
        self.status.stun.is_stunned()
    }

    /// Takes part in the rotation.
    pub fn is_active(&self) -> bool {
        !self.auto_skip && !self.is_defeated()
    }

    pub fn owns(&self, move_id: MoveId) -> bool {
        self.moves.contains(&move_id)
    }

    pub fn cooldown(&self, move_id: MoveId) -> u32 {
        self.cooldowns.get(&move_id).copied().unwrap_or(0)
    }

    /// Removes up to `amount` power and returns how much was actually lost.
    pub fn take_damage(&mut self, amount: u64) -> u64 {
        let lost = amount.min(self.power);
        self.power -= lost;
        lost
    }

    /// Counts one of this fighter's own attacks against an active channeling window.
    ///
    /// Returns the expired window when the boost reverts.
    pub fn tick_channeling(&mut self) -> Option<super::status::Channeling> {
        let channeling = self.status.channeling.as_mut()?;
        channeling.attacks_remaining = channeling.attacks_remaining.saturating_sub(1);
        if channeling.attacks_remaining > 0 {
            return None;
        }
        let expired = self.status.channeling.take()?;
        self.power = expired.after_effect;
        Some(expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{
        AmmoEffect, DamageEffect, HealEffect, MoveCategory, MoveDefinition, MoveEffect,
        StaticMoveCatalog,
    };
    use crate::state::Channeling;

    fn catalog() -> StaticMoveCatalog {
        StaticMoveCatalog::new(vec![
            MoveDefinition::new(MoveId(0), "Shotgun", MoveCategory::Item)
                .with_effect(MoveEffect::Damage(DamageEffect::fixed(65)))
                .with_effect(MoveEffect::Ammo(AmmoEffect { magazine: 30 })),
            MoveDefinition::new(MoveId(1), "Sensu Bean", MoveCategory::Item).with_effect(
                MoveEffect::Heal(HealEffect {
                    min: 1.0,
                    max: 1.0,
                    chance: 1.0,
                }),
            ),
            MoveDefinition::new(MoveId(2), "Heal", MoveCategory::Special)
                .with_ki()
                .with_effect(MoveEffect::Heal(HealEffect {
                    min: 0.3,
                    max: 0.3,
                    chance: 0.99,
                })),
        ])
        .expect("valid catalog")
    }

    #[test]
    fn build_fills_magazines_and_item_charges() {
        let config = FighterConfig::new("Fighter One", Race::Human, 1000)
            .with_moves([MoveId(0), MoveId(1), MoveId(2)]);
        let fighter = Fighter::build(FighterId(0), config, &catalog());

        assert_eq!(fighter.ammo.get(&MoveId(0)), Some(&30));
        assert_eq!(fighter.item_uses.get(&MoveId(1)), Some(&1));
        // Ki heals are unlimited and never tracked
        assert!(!fighter.item_uses.contains_key(&MoveId(2)));
        assert_eq!(fighter.max_power, 1000);
    }

    #[test]
    fn configured_item_charges_win_over_default() {
        let mut config =
            FighterConfig::new("Fighter Two", Race::Saiyan, 1000).with_moves([MoveId(1)]);
        config.item_uses.insert(MoveId(1), 3);
        let fighter = Fighter::build(FighterId(1), config, &catalog());
        assert_eq!(fighter.item_uses.get(&MoveId(1)), Some(&3));
    }

    #[test]
    fn take_damage_never_goes_negative() {
        let config = FighterConfig::new("Fighter One", Race::Human, 100);
        let mut fighter = Fighter::build(FighterId(0), config, &catalog());
        assert_eq!(fighter.take_damage(250), 100);
        assert_eq!(fighter.power, 0);
        assert!(fighter.is_defeated());
    }

    #[test]
    fn channeling_reverts_on_last_attack() {
        let config = FighterConfig::new("Fighter One", Race::Human, 1000);
        let mut fighter = Fighter::build(FighterId(0), config, &catalog());
        fighter.status.channeling = Some(Channeling {
            initial: 400,
            boosted: 1000,
            after_effect: 200,
            attacks_remaining: 2,
        });

        assert!(fighter.tick_channeling().is_none());
        let expired = fighter.tick_channeling().expect("window closes");
        assert_eq!(expired.initial, 400);
        assert_eq!(fighter.power, 200);
        assert!(fighter.status.channeling.is_none());
    }

    #[test]
    fn race_parses_display_names() {
        assert_eq!(
            "Infinite Ki Android".parse::<Race>().ok(),
            Some(Race::InfiniteKiAndroid)
        );
        assert!(Race::InfiniteKiAndroid.uses_max_power_basis());
        assert!(!Race::Duugo.uses_max_power_basis());
    }
}
