//! Fixed-size rotation of combatants.

use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::env::{MoveId, MoveOracle};

use super::{Fighter, FighterConfig, FighterId};

/// Errors raised while building a roster from configuration.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("roster is empty")]
    Empty,

    #[error("roster has {0} fighters, the rotation holds at most 8")]
    TooManyFighters(usize),

    #[error("{fighter} owns unknown move {move_id}")]
    UnknownMove { fighter: String, move_id: MoveId },
}

/// Combatants indexed by their rotation slot.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    fighters: ArrayVec<Fighter, { CombatConfig::MAX_COMBATANTS }>,
}

impl Roster {
    /// Builds every fighter from its configuration, slot by slot.
    pub fn build<M>(
        configs: impl IntoIterator<Item = FighterConfig>,
        catalog: &M,
    ) -> Result<Self, RosterError>
    where
        M: MoveOracle + ?Sized,
    {
        let configs: Vec<FighterConfig> = configs.into_iter().collect();
        if configs.is_empty() {
            return Err(RosterError::Empty);
        }
        if configs.len() > CombatConfig::MAX_COMBATANTS {
            return Err(RosterError::TooManyFighters(configs.len()));
        }

        let mut fighters = ArrayVec::new();
        for (slot, config) in configs.into_iter().enumerate() {
            Self::check_moves(&config, catalog)?;
            fighters.push(Fighter::build(FighterId(slot as u8), config, catalog));
        }
        Ok(Self { fighters })
    }

    fn check_moves<M>(config: &FighterConfig, catalog: &M) -> Result<(), RosterError>
    where
        M: MoveOracle + ?Sized,
    {
        let unknown = config
            .moves
            .iter()
            .chain(config.item_uses.keys())
            .find(|id| catalog.definition(**id).is_none());
        match unknown {
            Some(&move_id) => Err(RosterError::UnknownMove {
                fighter: config.name.clone(),
                move_id,
            }),
            None => Ok(()),
        }
    }

    /// Rebuilds every fighter from its stored configuration.
    pub fn rebuild<M>(&mut self, catalog: &M)
    where
        M: MoveOracle + ?Sized,
    {
        for fighter in self.fighters.iter_mut() {
            *fighter = Fighter::build(fighter.id, fighter.config.clone(), catalog);
        }
    }

    pub fn get(&self, id: FighterId) -> Option<&Fighter> {
        self.fighters.get(id.slot())
    }

    pub fn get_mut(&mut self, id: FighterId) -> Option<&mut Fighter> {
        self.fighters.get_mut(id.slot())
    }

    pub fn contains(&self, id: FighterId) -> bool {
        id.slot() < self.fighters.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fighter> {
        self.fighters.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Fighter> {
        self.fighters.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.fighters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fighters.is_empty()
    }

    /// Fighters still in the rotation.
    pub fn active(&self) -> impl Iterator<Item = &Fighter> {
        self.fighters.iter().filter(|f| f.is_active())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{MoveCategory, MoveDefinition, StaticMoveCatalog};
    use crate::state::Race;

    fn catalog() -> StaticMoveCatalog {
        StaticMoveCatalog::new(vec![MoveDefinition::new(
            MoveId(0),
            "Punch",
            MoveCategory::Basic,
        )])
        .expect("valid catalog")
    }

    #[test]
    fn slots_follow_config_order() {
        let roster = Roster::build(
            [
                FighterConfig::new("A", Race::Human, 1000),
                FighterConfig::new("B", Race::Saiyan, 900),
            ],
            &catalog(),
        )
        .expect("roster");
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.get(FighterId(1)).map(|f| f.power), Some(900));
        assert!(!roster.contains(FighterId(2)));
    }

    #[test]
    fn rejects_unknown_moves_and_oversized_rosters() {
        let bad = FighterConfig::new("A", Race::Human, 1000).with_moves([MoveId(7)]);
        assert!(matches!(
            Roster::build([bad], &catalog()),
            Err(RosterError::UnknownMove { .. })
        ));

        let nine = (0..9).map(|i| FighterConfig::new(format!("F{i}"), Race::Human, 10));
        assert_eq!(
            Roster::build(nine, &catalog()),
            Err(RosterError::TooManyFighters(9))
        );
        assert_eq!(
            Roster::build(Vec::new(), &catalog()),
            Err(RosterError::Empty)
        );
    }
}
