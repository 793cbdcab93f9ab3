//! Content factory for building the catalog, roster and tuning from data files.

use std::path::{Path, PathBuf};

use arena_core::{CombatConfig, FighterConfig, MoveOracle, StaticMoveCatalog};

use crate::loaders::{ConfigLoader, LoadResult, MoveLoader, RosterLoader};

/// Content factory that loads all match content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── moves.ron
/// └── roster.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine tuning from `config.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the move catalog from `moves.ron`.
    pub fn load_moves(&self) -> LoadResult<StaticMoveCatalog> {
        MoveLoader::load(&self.data_dir.join("moves.ron"))
    }

    /// Load fighters from `roster.ron`, resolving move names against `catalog`.
    pub fn load_roster<M>(&self, catalog: &M) -> LoadResult<Vec<FighterConfig>>
    where
        M: MoveOracle + ?Sized,
    {
        RosterLoader::load(&self.data_dir.join("roster.ron"), catalog)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
