//! Referee session: one battle, its oracles and its observers.
//!
//! The session is the synchronous entry point collaborators drive. Every
//! command runs inside an `info_span!` tagged with the command label and the
//! nonce it was submitted at.

use std::sync::Arc;

use arena_core::{
    Battle, CombatConfig, CombatEngine, CombatError, CombatState, Command, ExecutionOutcome,
    FighterConfig, FighterId, Roster, StaticMoveCatalog,
};
use tracing::{debug, error, info, info_span, warn};

use crate::api::{Result, RuntimeError};
use crate::observers::{CombatObserver, ObserverContext, ObserverRegistry};
use crate::oracle::OracleManager;
use crate::save;

/// Seed used when the builder is not given one.
pub const DEFAULT_SEED: u64 = 0x5eed_a7e4a;

pub struct Session {
    oracles: OracleManager,
    battle: Battle,
    observers: ObserverRegistry,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Session over the embedded standard catalog, roster and tuning.
    pub fn standard(seed: u64) -> Result<Self> {
        let catalog = arena_content::standard_catalog()?;
        let roster = arena_content::standard_roster(&catalog)?;
        let config = arena_content::standard_config()?;
        Self::builder()
            .config(config)
            .catalog(catalog)
            .roster(roster)
            .seed(seed)
            .build()
    }

    pub fn state(&self) -> &CombatState {
        &self.battle.state
    }

    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    pub fn oracles(&self) -> &OracleManager {
        &self.oracles
    }

    /// Who takes the turn once the current actor's turn ends.
    pub fn next_actor(&mut self) -> FighterId {
        CombatEngine::new(&mut self.battle).peek_next_actor().actor
    }

    pub fn register_observer(&mut self, observer: Arc<dyn CombatObserver>) {
        self.observers.register(observer);
    }

    /// Validates and applies one command.
    ///
    /// A rejected command leaves the battle untouched and notifies nobody.
    pub fn submit(&mut self, command: impl Into<Command>) -> Result<ExecutionOutcome> {
        let command = command.into();
        let span = info_span!("command", label = command.label(), nonce = self.battle.state.nonce);
        let _guard = span.enter();

        let was_over = self.battle.state.is_game_over();
        let env = self.oracles.as_combat_env();
        let mut engine = CombatEngine::new(&mut self.battle);

        let outcome = match engine.execute(env, &command) {
            Ok(outcome) => outcome,
            Err(e) => {
                let severity = e.severity();
                if severity.is_internal() {
                    error!(
                        target: "runtime::session",
                        code = e.error_code(),
                        severity = severity.as_str(),
                        phase = e.phase().as_str(),
                        error = %e,
                        "Command failed"
                    );
                } else {
                    warn!(
                        target: "runtime::session",
                        code = e.error_code(),
                        severity = severity.as_str(),
                        phase = e.phase().as_str(),
                        error = %e,
                        "Command rejected"
                    );
                }
                return Err(e.into());
            }
        };

        let next = engine.peek_next_actor();
        info!(
            target: "runtime::session",
            actor = ?command.actor(),
            result = ?outcome.result,
            next = %next.actor,
            "Command accepted"
        );
        self.after_accept(Some(&command), &outcome, was_over)?;
        Ok(outcome)
    }

    /// Restores the earliest retained snapshot taken during `turn`.
    pub fn rollback_to(&mut self, turn: u32) -> Result<ExecutionOutcome> {
        let span = info_span!("rollback", turn, nonce = self.battle.state.nonce);
        let _guard = span.enter();

        let was_over = self.battle.state.is_game_over();
        let outcome = CombatEngine::new(&mut self.battle)
            .rollback_to(turn)
            .inspect_err(|e| {
                warn!(target: "runtime::session", code = e.error_code(), error = %e, "Rollback rejected")
            })?;

        info!(target: "runtime::session", result = ?outcome.result, "Rolled back");
        self.after_accept(None, &outcome, was_over)?;
        Ok(outcome)
    }

    /// Rebuilds every fighter and starts the match over. Seed and nonce carry on.
    pub fn reset(&mut self) -> Result<ExecutionOutcome> {
        let span = info_span!("reset", nonce = self.battle.state.nonce);
        let _guard = span.enter();

        let env = self.oracles.as_combat_env();
        let outcome = CombatEngine::new(&mut self.battle).reset(env)?;

        info!(target: "runtime::session", "Match reset");
        self.after_accept(None, &outcome, true)?;
        Ok(outcome)
    }

    /// Serialises state and history into a digest-protected blob.
    pub fn save(&self) -> Result<Vec<u8>> {
        let bytes = save::encode(&self.battle)?;
        debug!(
            target: "runtime::session",
            bytes = bytes.len(),
            digest = %save::digest_hex(&bytes),
            "Battle saved"
        );
        Ok(bytes)
    }

    /// Replaces the battle with a saved one after verifying it.
    pub fn restore(&mut self, bytes: &[u8]) -> Result<()> {
        let battle = save::decode(bytes)?;
        save::check_moves(&battle.state, self.oracles.catalog())?;
        info!(
            target: "runtime::session",
            nonce = battle.state.nonce,
            turn = battle.state.turn.number,
            digest = %save::digest_hex(bytes),
            "Battle restored"
        );
        self.battle = battle;
        Ok(())
    }

    pub fn export_json(&self) -> Result<String> {
        Ok(save::export_json(&self.battle.state)?)
    }

    /// Every log entry so far, one rendered line each.
    pub fn transcript(&self) -> Vec<String> {
        self.battle.state.log.iter().map(ToString::to_string).collect()
    }

    fn after_accept(
        &self,
        command: Option<&Command>,
        outcome: &ExecutionOutcome,
        was_over: bool,
    ) -> Result<()> {
        let state = &self.battle.state;
        debug!(
            target: "runtime::session",
            nonce = state.nonce,
            turn = state.turn.number,
            current = %state.current_actor(),
            entries = outcome.entries.len(),
            "Command applied"
        );
        for warning in &outcome.warnings {
            warn!(target: "runtime::session", %warning, "Engine warning");
        }

        let match_ended = !was_over && state.is_game_over();
        if match_ended {
            info!(
                target: "runtime::session",
                winner = ?state.outcome.winner,
                reason = ?state.outcome.reason,
                "Match over"
            );
        }

        self.observers.notify_all(&ObserverContext {
            command,
            outcome,
            state,
            match_ended,
        })
    }
}

/// Builder for [`Session`].
pub struct SessionBuilder {
    config: CombatConfig,
    catalog: Option<StaticMoveCatalog>,
    roster: Option<Vec<FighterConfig>>,
    seed: u64,
    observers: ObserverRegistry,
}

impl SessionBuilder {
    fn new() -> Self {
        Self {
            config: CombatConfig::default(),
            catalog: None,
            roster: None,
            seed: DEFAULT_SEED,
            observers: ObserverRegistry::default(),
        }
    }

    pub fn config(mut self, config: CombatConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required move catalog.
    pub fn catalog(mut self, catalog: StaticMoveCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Set the required fighter definitions, in rotation order.
    pub fn roster(mut self, roster: Vec<FighterConfig>) -> Self {
        self.roster = Some(roster);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_observers(mut self, observers: ObserverRegistry) -> Self {
        self.observers = observers;
        self
    }

    pub fn observer(mut self, observer: Arc<dyn CombatObserver>) -> Self {
        self.observers.register(observer);
        self
    }

    pub fn build(self) -> Result<Session> {
        let catalog = self.catalog.ok_or(RuntimeError::MissingCatalog)?;
        let configs = self.roster.ok_or(RuntimeError::MissingRoster)?;
        let roster = Roster::build(configs, &catalog)?;

        let state = CombatState::new(self.seed, roster);
        info!(
            target: "runtime::session",
            seed = self.seed,
            fighters = state.roster.len(),
            active = state.roster.active().count(),
            first = %state.current_actor(),
            "Session initialized"
        );

        let battle = Battle::new(state, self.config.history_capacity);
        Ok(Session {
            oracles: OracleManager::new(Arc::new(catalog), Arc::new(self.config)),
            battle,
            observers: self.observers,
        })
    }
}
