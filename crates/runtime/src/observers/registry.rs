//! Observer registry.

use std::sync::Arc;

use tracing::{debug, error};

use super::{CombatObserver, ObserverContext, ObserverCriticality, ObserverError};
use crate::api::{Result, RuntimeError};

/// Registry holding observers sorted by priority.
#[derive(Clone, Default)]
pub struct ObserverRegistry {
    observers: Vec<Arc<dyn CombatObserver>>,
}

impl ObserverRegistry {
    pub fn new(mut observers: Vec<Arc<dyn CombatObserver>>) -> Self {
        observers.sort_by_key(|o| o.priority());
        Self { observers }
    }

    /// Adds an observer, keeping priority order. Ties keep registration order.
    pub fn register(&mut self, observer: Arc<dyn CombatObserver>) {
        let index = self
            .observers
            .partition_point(|o| o.priority() <= observer.priority());
        self.observers.insert(index, observer);
    }

    /// Notifies every interested observer in priority order.
    ///
    /// # Error Handling
    ///
    /// - `Critical`: stops and returns the failure
    /// - `Important`: logs at error level and continues
    /// - `Optional`: logs at debug level and continues
    pub fn notify_all(&self, ctx: &ObserverContext<'_>) -> Result<()> {
        for observer in &self.observers {
            if !observer.should_notify(ctx) {
                continue;
            }
            if let Err(e) = observer.notify(ctx) {
                self.handle_observer_error(observer.as_ref(), e)?;
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Observer names and priorities in execution order (for debugging).
    pub fn observers(&self) -> impl Iterator<Item = (&'static str, i32)> + '_ {
        self.observers.iter().map(|o| (o.name(), o.priority()))
    }

    fn handle_observer_error(
        &self,
        observer: &dyn CombatObserver,
        failure: ObserverError,
    ) -> Result<()> {
        match observer.criticality() {
            ObserverCriticality::Critical => {
                error!(
                    target: "runtime::observers",
                    observer = observer.name(),
                    criticality = "critical",
                    error = %failure,
                    "Critical observer failed"
                );
                Err(RuntimeError::ObserverFailed {
                    name: observer.name(),
                    message: failure.0,
                })
            }
            ObserverCriticality::Important => {
                error!(
                    target: "runtime::observers",
                    observer = observer.name(),
                    criticality = "important",
                    error = %failure,
                    "Observer failed, continuing"
                );
                Ok(())
            }
            ObserverCriticality::Optional => {
                debug!(
                    target: "runtime::observers",
                    observer = observer.name(),
                    criticality = "optional",
                    error = %failure,
                    "Optional observer failed"
                );
                Ok(())
            }
        }
    }
}
