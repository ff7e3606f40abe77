//! Timer-driven alert simulation
//!
//! Feeds the store a steady trickle of alerts when no live backend is
//! attached, cycling through a fixed template pool.

use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::ReentrantMutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::models::{Alert, NewAlert};

use super::seed::simulation_templates;
use super::store::AlertStore;

/// Default period between simulated alerts
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(15);

/// Periodically raises alerts from a template pool.
///
/// The template cursor belongs to the driver: it advances on every tick,
/// is not reset by stopping, and a later `start()` on the same driver
/// resumes where the previous run left off.
pub struct SimulationDriver {
    store: AlertStore,
    templates: Arc<[NewAlert]>,
    period: Duration,
    cursor: Arc<AtomicUsize>,
}

impl SimulationDriver {
    /// Create a driver over a custom template pool
    pub fn new(store: AlertStore, templates: Vec<NewAlert>, period: Duration) -> Self {
        Self {
            store,
            templates: templates.into(),
            period,
            cursor: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a driver over the built-in template pool
    pub fn with_default_templates(store: AlertStore, period: Duration) -> Self {
        Self::new(store, simulation_templates(), period)
    }

    /// Period between ticks
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Number of ticks taken so far
    pub fn position(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    /// Raise the next template immediately. Returns `None` for an empty pool.
    pub fn tick(&self) -> Option<Arc<Alert>> {
        emit_next(&self.store, &self.templates, &self.cursor)
    }

    /// Start ticking on the tokio runtime. The first alert is raised one
    /// period after this call.
    pub fn start(&self) -> SimulationHandle {
        let active = Arc::new(ReentrantMutex::new(Cell::new(true)));

        let store = self.store.clone();
        let templates = Arc::clone(&self.templates);
        let cursor = Arc::clone(&self.cursor);
        let period = self.period;
        let flag = Arc::clone(&active);

        info!(
            period_ms = period.as_millis() as u64,
            templates = templates.len(),
            "Starting alert simulation"
        );

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let guard = flag.lock();
                if !guard.get() {
                    break;
                }
                emit_next(&store, &templates, &cursor);
            }
        });

        SimulationHandle {
            active,
            task: Some(task),
        }
    }
}

fn emit_next(store: &AlertStore, templates: &[NewAlert], cursor: &AtomicUsize) -> Option<Arc<Alert>> {
    if templates.is_empty() {
        return None;
    }

    let position = cursor.fetch_add(1, Ordering::SeqCst);
    let template = templates[position % templates.len()].clone();

    debug!(position, title = %template.title, "Simulated alert");

    Some(store.add_alert(template))
}

/// A running simulation. Stopping (or dropping) it ends the timer.
#[must_use = "dropping the handle stops the simulation"]
pub struct SimulationHandle {
    active: Arc<ReentrantMutex<Cell<bool>>>,
    task: Option<JoinHandle<()>>,
}

impl SimulationHandle {
    /// Whether ticks may still fire
    pub fn is_running(&self) -> bool {
        self.active.lock().get()
    }

    /// Stop the timer. No tick begins after this returns; a listener may
    /// call it from inside a tick.
    pub fn stop(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        {
            let guard = self.active.lock();
            guard.set(false);
        }

        if let Some(task) = self.task.take() {
            task.abort();
            info!("Alert simulation stopped");
        }
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        self.halt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_cycles_through_pool() {
        let store = AlertStore::unseeded();
        let driver = SimulationDriver::with_default_templates(store.clone(), DEFAULT_INTERVAL);
        let pool = simulation_templates();

        for _ in 0..pool.len() + 1 {
            driver.tick();
        }

        let snapshot = store.snapshot();
        assert_eq!(driver.position(), pool.len() + 1);
        assert_eq!(snapshot[0].title, pool[0].title);
        assert_eq!(snapshot[pool.len()].title, pool[0].title);
    }

    #[test]
    fn test_empty_pool_is_noop() {
        let store = AlertStore::unseeded();
        let driver = SimulationDriver::new(store.clone(), Vec::new(), DEFAULT_INTERVAL);

        assert!(driver.tick().is_none());
        assert_eq!(driver.position(), 0);
        assert!(store.snapshot().is_empty());
    }
}
