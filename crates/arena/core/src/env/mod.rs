//! Read-only collaborators of the engine.
//!
//! The move catalog, the dice and the engine tuning are injected through the
//! [`Env`] aggregate so transitions never reach for globals.
mod catalog;
mod error;
mod moves;
mod rng;

pub use catalog::StaticMoveCatalog;
pub use error::{CatalogError, OracleError};
pub use moves::{
    AbsorbParams, AmmoEffect, ArmorEffect, BlockParams, ChannelEffect, ChargeEffect,
    CriticalHit, DamageAmount, DamageBoost, DamageEffect, DefenseKind, HealEffect, MoveCategory,
    MoveDefinition, MoveEffect, MoveGrant, MoveId, ReflectParams, SelfDamageEffect, StunOnHit,
    ToggleEffect, TransformEffect,
};
pub use rng::{PcgRng, RngOracle, RollContext, compute_seed};

use crate::config::CombatConfig;

/// Read access to move definitions.
pub trait MoveOracle: Send + Sync {
    fn definition(&self, id: MoveId) -> Option<&MoveDefinition>;

    /// Resolves a display name to its id.
    fn lookup(&self, name: &str) -> Option<MoveId>;
}

/// Aggregates the read-only oracles required by command transitions.
pub struct Env<'a, M, R>
where
    M: MoveOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    moves: Option<&'a M>,
    rng: Option<&'a R>,
    config: Option<&'a CombatConfig>,
}

impl<M, R> Clone for Env<'_, M, R>
where
    M: MoveOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<M, R> Copy for Env<'_, M, R>
where
    M: MoveOracle + ?Sized,
    R: RngOracle + ?Sized,
{
}

pub type CombatEnv<'a> = Env<'a, dyn MoveOracle + 'a, dyn RngOracle + 'a>;

impl<'a, M, R> Env<'a, M, R>
where
    M: MoveOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    pub fn new(
        moves: Option<&'a M>,
        rng: Option<&'a R>,
        config: Option<&'a CombatConfig>,
    ) -> Self {
        Self { moves, rng, config }
    }

    pub fn with_all(moves: &'a M, rng: &'a R, config: &'a CombatConfig) -> Self {
        Self::new(Some(moves), Some(rng), Some(config))
    }

    pub fn empty() -> Self {
        Self {
            moves: None,
            rng: None,
            config: None,
        }
    }

    /// # Errors
    ///
    /// Returns `OracleError::MovesNotAvailable` if no catalog was provided.
    pub fn moves(&self) -> Result<&'a M, OracleError> {
        self.moves.ok_or(OracleError::MovesNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::RngNotAvailable` if no rng oracle was provided.
    pub fn rng(&self) -> Result<&'a R, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::ConfigNotAvailable` if no config was provided.
    pub fn config(&self) -> Result<&'a CombatConfig, OracleError> {
        self.config.ok_or(OracleError::ConfigNotAvailable)
    }

    /// Looks up a definition, turning a miss into an error.
    pub fn definition(&self, id: MoveId) -> Result<&'a MoveDefinition, OracleError> {
        self.moves()?
            .definition(id)
            .ok_or(OracleError::MoveNotFound(id))
    }
}

impl<'a, M, R> Env<'a, M, R>
where
    M: MoveOracle + 'a,
    R: RngOracle + 'a,
{
    /// Converts this environment into the trait-object based [`CombatEnv`].
    pub fn as_combat_env(&self) -> CombatEnv<'a> {
        let moves: Option<&'a dyn MoveOracle> = self.moves.map(|moves| moves as _);
        let rng: Option<&'a dyn RngOracle> = self.rng.map(|rng| rng as _);
        Env::new(moves, rng, self.config)
    }
}
