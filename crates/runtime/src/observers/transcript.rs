//! Observer that keeps the rendered combat log lines.

use std::sync::{Arc, Mutex};

use super::{CombatObserver, ObserverContext, ObserverCriticality, ObserverError};

/// Collects one rendered line per new log entry and warning.
///
/// Clones share the same buffer, so a caller can keep one handle and register
/// the other with the session.
#[derive(Clone, Default)]
pub struct TranscriptObserver {
    lines: Arc<Mutex<Vec<String>>>,
}

impl TranscriptObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl CombatObserver for TranscriptObserver {
    fn name(&self) -> &'static str {
        "transcript"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn criticality(&self) -> ObserverCriticality {
        ObserverCriticality::Optional
    }

    fn notify(&self, ctx: &ObserverContext<'_>) -> Result<(), ObserverError> {
        let mut lines = self
            .lines
            .lock()
            .map_err(|_| ObserverError::new("transcript buffer poisoned"))?;
        lines.extend(ctx.outcome.entries.iter().map(ToString::to_string));
        lines.extend(
            ctx.outcome
                .warnings
                .iter()
                .map(|warning| format!("warning: {warning}")),
        );
        Ok(())
    }
}
