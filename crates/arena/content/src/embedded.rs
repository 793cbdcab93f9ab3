//! Standard content compiled into the crate.

use arena_core::{CombatConfig, FighterConfig, MoveOracle, StaticMoveCatalog};

use crate::loaders::{ConfigLoader, LoadResult, MoveLoader, RosterLoader};

const MOVES: &str = include_str!("../data/moves.ron");
const ROSTER: &str = include_str!("../data/roster.ron");
const CONFIG: &str = include_str!("../data/config.toml");

/// The standard move catalog.
pub fn standard_catalog() -> LoadResult<StaticMoveCatalog> {
    MoveLoader::parse(MOVES)
}

/// The standard eight-slot roster, resolved against `catalog`.
pub fn standard_roster<M>(catalog: &M) -> LoadResult<Vec<FighterConfig>>
where
    M: MoveOracle + ?Sized,
{
    RosterLoader::parse(ROSTER, catalog)
}

pub fn standard_config() -> LoadResult<CombatConfig> {
    ConfigLoader::parse(CONFIG)
}
