//! Runtime orchestration for the arena combat engine.
//!
//! This crate wires the engine, the content oracles and the observers into a
//! single synchronous [`Session`] API. Clients build a session, submit
//! commands, and read back outcomes, the log and saved battles.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the session and its builder
//! - [`api`] exposes the error types downstream clients interact with
//! - [`observers`] provides the post-command notification system
//! - [`oracle`] adapts the catalog and tuning into the engine's env
//! - [`save`] encodes battles into digest-protected blobs
//! - [`scenario`] replays scripted bouts against a session
pub mod api;
pub mod observers;
pub mod oracle;
pub mod save;
pub mod scenario;
pub mod session;

pub use api::{Result, RuntimeError, SaveError, ScriptError};
pub use observers::{
    CombatObserver, ObserverContext, ObserverCriticality, ObserverError, ObserverRegistry,
    TranscriptObserver,
};
pub use oracle::OracleManager;
pub use scenario::{BoutReport, BoutScript, BoutStep, ResolvedStep, play};
pub use session::{DEFAULT_SEED, Session, SessionBuilder};
