//! Engine tuning loader.

use std::path::Path;

use arena_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat tuning from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Omitted keys keep their [`CombatConfig::default`] values.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        let chances = [
            ("dodge_base", config.dodge_base),
            ("parity_band", config.parity_band),
            ("dodge_step", config.dodge_step),
            ("ki_dodge_bonus", config.ki_dodge_bonus),
            ("chance_cap", config.chance_cap),
        ];
        for (field, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                anyhow::bail!("Config field '{}' must be within [0, 1], got {}", field, value);
            }
        }
        if !(1..=CombatConfig::HISTORY_LIMIT).contains(&config.history_capacity) {
            anyhow::bail!(
                "Config field 'history_capacity' must be within [1, {}], got {}",
                CombatConfig::HISTORY_LIMIT,
                config.history_capacity
            );
        }
        Ok(config)
    }
}
