//! Data-driven content definitions and loaders.
//!
//! This crate houses the static arena content and the loaders for its data files:
//! - Move catalog (data-driven via RON, moves reference each other by name)
//! - Roster: fighters, named movesets and AI profiles (data-driven via RON)
//! - Engine tuning (data-driven via TOML)
//!
//! Content is consumed by the runtime as oracles and fighter configurations;
//! it never appears in combat state except through the ids it resolves to.
//! The standard catalog and roster ship embedded in the crate.

#[cfg(feature = "loaders")]
pub mod embedded;
#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use embedded::{standard_catalog, standard_config, standard_roster};
#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, FighterSpec, LoadResult, MoveLoader, MoveSpec, RosterFile,
    RosterLoader,
};
