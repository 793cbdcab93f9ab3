//! Runtime wrapper around the static combat oracles.
//!
//! The catalog and tuning are immutable for the life of a session; dynamic
//! state lives in the [`arena_core::Battle`] the session owns. The manager
//! builds [`CombatEnv`] views on demand.
use std::sync::Arc;

use arena_core::{CombatConfig, CombatEnv, Env, PcgRng, StaticMoveCatalog};

/// Manages the oracle implementations and provides unified access.
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) catalog: Arc<StaticMoveCatalog>,
    pub(crate) config: Arc<CombatConfig>,
    pub(crate) rng: PcgRng,
}

impl OracleManager {
    pub fn new(catalog: Arc<StaticMoveCatalog>, config: Arc<CombatConfig>) -> Self {
        Self {
            catalog,
            config,
            rng: PcgRng, // PcgRng is stateless
        }
    }

    /// Converts the manager into the env the engine consumes.
    pub fn as_combat_env(&self) -> CombatEnv<'_> {
        Env::with_all(self.catalog.as_ref(), &self.rng, self.config.as_ref()).as_combat_env()
    }

    pub fn catalog(&self) -> &StaticMoveCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }
}
