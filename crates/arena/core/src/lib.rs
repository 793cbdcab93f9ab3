//! Deterministic rules for turn-based arena combat.
//!
//! `arena-core` owns the canonical combat rules: who acts next, how an attack
//! turns into a pending defense, how defenses, armor and status effects shape
//! the damage that lands, and how the surrender handshake and referee
//! overrides fit in. All state mutation flows through [`engine::CombatEngine`];
//! the move catalog, the dice and the tuning are injected through [`env::Env`].
pub mod combat;
pub mod command;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod state;

pub use command::{
    AttackCommand, AttackError, AttackResolution, Command, CommandTransition, DefendCommand,
    DefenseError, Intent, RefereeCommand, RefereeError, SequenceError, SkipCommand, SkipError,
    SurrenderCommand, SurrenderError, SurrenderResponse,
};
pub use config::CombatConfig;
pub use engine::{
    CombatEngine, CommandResult, EngineWarning, ExecuteError, ExecutionOutcome, RollbackError,
    TransitionPhase, TransitionPhaseError,
};
pub use env::{
    CatalogError, CombatEnv, DefenseKind, Env, MoveCategory, MoveDefinition, MoveEffect, MoveId,
    MoveOracle, OracleError, PcgRng, RngOracle, RollContext, StaticMoveCatalog,
};
pub use error::{CombatError, ErrorKind, ErrorSeverity};
pub use state::{
    Battle, CombatLog, CombatState, EndReason, Fighter, FighterConfig, FighterId, LogEntry,
    LogKind, MatchOutcome, OutcomeFlags, Race, Roster, RosterError, SkipReason, SurrenderResult,
    TurnHistory, TurnState,
};
