//! Roster loader.
//!
//! Fighters name their moves; shared move lists live in `movesets` and shared
//! AI parameters in `ai_profiles`, both referenced by key.

use std::collections::BTreeMap;
use std::path::Path;

use arena_core::state::AiProfile;
use arena_core::{CombatConfig, FighterConfig, MoveOracle, Race};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Roster file structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterFile {
    pub movesets: BTreeMap<String, Vec<String>>,
    pub ai_profiles: BTreeMap<String, AiProfile>,
    pub fighters: Vec<FighterSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FighterSpec {
    pub name: String,
    #[serde(default)]
    pub race: Race,
    pub base_power: u64,
    /// Starting power; defaults to `base_power`.
    #[serde(default)]
    pub current_power: Option<u64>,
    /// Key into `movesets`, prepended to `moves`.
    #[serde(default)]
    pub moveset: Option<String>,
    #[serde(default)]
    pub moves: Vec<String>,
    #[serde(default)]
    pub item_uses: BTreeMap<String, u32>,
    #[serde(default)]
    pub auto_skip: bool,
    /// Key into `ai_profiles`.
    #[serde(default)]
    pub ai: Option<String>,
}

/// Loader for fighter rosters from RON files.
pub struct RosterLoader;

impl RosterLoader {
    /// Load a roster from a RON file, resolving move names against `catalog`.
    pub fn load<M>(path: &Path, catalog: &M) -> LoadResult<Vec<FighterConfig>>
    where
        M: MoveOracle + ?Sized,
    {
        let content = read_file(path)?;
        Self::parse(&content, catalog)
    }

    pub fn parse<M>(content: &str, catalog: &M) -> LoadResult<Vec<FighterConfig>>
    where
        M: MoveOracle + ?Sized,
    {
        let file: RosterFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))?;
        Self::resolve(file, catalog)
    }

    pub fn resolve<M>(file: RosterFile, catalog: &M) -> LoadResult<Vec<FighterConfig>>
    where
        M: MoveOracle + ?Sized,
    {
        if file.fighters.is_empty() {
            anyhow::bail!("Roster has no fighters");
        }
        if file.fighters.len() > CombatConfig::MAX_COMBATANTS {
            anyhow::bail!(
                "Roster has {} fighters, at most {} allowed",
                file.fighters.len(),
                CombatConfig::MAX_COMBATANTS
            );
        }

        let lookup = |fighter: &str, name: &str| {
            catalog.lookup(name).ok_or_else(|| {
                anyhow::anyhow!("Fighter '{}' references unknown move '{}'", fighter, name)
            })
        };

        let mut configs = Vec::with_capacity(file.fighters.len());
        for spec in file.fighters {
            let shared: &[String] = match &spec.moveset {
                Some(key) => file.movesets.get(key).ok_or_else(|| {
                    anyhow::anyhow!("Fighter '{}' references unknown moveset '{}'", spec.name, key)
                })?,
                None => &[],
            };

            let mut moves = Vec::new();
            for name in shared.iter().chain(spec.moves.iter()) {
                let id = lookup(&spec.name, name)?;
                if !moves.contains(&id) {
                    moves.push(id);
                }
            }

            let mut item_uses = BTreeMap::new();
            for (name, uses) in &spec.item_uses {
                item_uses.insert(lookup(&spec.name, name)?, *uses);
            }

            let ai = match &spec.ai {
                Some(key) => Some(file.ai_profiles.get(key).cloned().ok_or_else(|| {
                    anyhow::anyhow!("Fighter '{}' references unknown AI profile '{}'", spec.name, key)
                })?),
                None => None,
            };

            configs.push(FighterConfig {
                current_power: spec.current_power.unwrap_or(spec.base_power),
                base_power: spec.base_power,
                race: spec.race,
                moves,
                item_uses,
                ai,
                auto_skip: spec.auto_skip,
                name: spec.name,
            });
        }
        Ok(configs)
    }
}
