//! In-memory alert store with copy-on-write snapshots and change listeners
//!
//! The store is the single owner of the alert list. Every mutation builds a
//! new list and swaps it in, so a [`Snapshot`] handed out earlier never
//! changes underneath its holder, and two reads with no mutation in between
//! return the same `Arc`. Listeners are called after the swap, outside the
//! lock, so a listener may read or mutate the store itself.

use std::sync::{Arc, Weak};

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::models::{Alert, NewAlert};
use crate::time::now_millis;

use super::seed::sample_alerts;

/// Read-only, point-in-time view of the alert list (newest first)
pub type Snapshot = Arc<Vec<Arc<Alert>>>;

/// Zero-argument change callback
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Builds the initial records from the wall-clock time at initialization
type SeedFn = dyn Fn(i64) -> Vec<Alert> + Send + Sync;

static EMPTY_SNAPSHOT: Lazy<Snapshot> = Lazy::new(|| Arc::new(Vec::new()));

static GLOBAL: Lazy<AlertStore> = Lazy::new(AlertStore::new);

/// The fixed empty snapshot. Every call returns the same `Arc`.
pub fn empty_snapshot() -> Snapshot {
    Arc::clone(&EMPTY_SNAPSHOT)
}

/// Process-wide store, seeded with the sample alerts on first use
pub fn global() -> &'static AlertStore {
    &GLOBAL
}

struct State {
    alerts: Snapshot,
    initialized: bool,
    listeners: Vec<Listener>,
}

struct Inner {
    state: Mutex<State>,
    seed: Box<SeedFn>,
}

/// Handle to an alert store. Clones share the same list and listeners.
#[derive(Clone)]
pub struct AlertStore {
    inner: Arc<Inner>,
}

impl Default for AlertStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AlertStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("AlertStore")
            .field("initialized", &state.initialized)
            .field("alerts", &state.alerts.len())
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

impl AlertStore {
    /// Create a store that seeds itself with the sample alerts
    pub fn new() -> Self {
        Self::with_seed(sample_alerts)
    }

    /// Create a store that starts empty once initialized
    pub fn unseeded() -> Self {
        Self::with_seed(|_| Vec::new())
    }

    /// Create a store with a custom seed routine. The routine receives the
    /// current time in milliseconds and must return records newest first.
    pub fn with_seed<F>(seed: F) -> Self
    where
        F: Fn(i64) -> Vec<Alert> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    alerts: empty_snapshot(),
                    initialized: false,
                    listeners: Vec::new(),
                }),
                seed: Box::new(seed),
            }),
        }
    }

    /// Seed the store. Only the first call does anything; returns whether
    /// this call performed the initialization.
    pub fn initialize(&self) -> bool {
        let mut state = self.inner.state.lock();
        self.initialize_locked(&mut state)
    }

    /// Whether the seed routine has run
    pub fn is_initialized(&self) -> bool {
        self.inner.state.lock().initialized
    }

    fn initialize_locked(&self, state: &mut State) -> bool {
        if state.initialized {
            return false;
        }

        let seeded: Vec<Arc<Alert>> = (self.inner.seed)(now_millis())
            .into_iter()
            .map(Arc::new)
            .collect();

        debug!(count = seeded.len(), "Alert store initialized");

        state.alerts = Arc::new(seeded);
        state.initialized = true;
        true
    }

    /// Register a listener, initializing the store on first use.
    ///
    /// Registration is keyed on the `Arc` pointer: subscribing the same
    /// `Arc` twice registers it once.
    pub fn subscribe(&self, listener: Listener) -> Subscription {
        let mut state = self.inner.state.lock();
        self.initialize_locked(&mut state);

        if !state.listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            state.listeners.push(Arc::clone(&listener));
        }

        debug!(listeners = state.listeners.len(), "Listener subscribed");

        Subscription {
            store: Arc::downgrade(&self.inner),
            listener,
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.inner.state.lock().listeners.len()
    }

    /// Current alert list. Before initialization this is the fixed empty
    /// snapshot. Never initializes the store.
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.inner.state.lock().alerts)
    }

    /// Snapshot for contexts that must not observe live state. Always the
    /// fixed empty snapshot.
    pub fn server_snapshot(&self) -> Snapshot {
        empty_snapshot()
    }

    /// Raise a new alert at the head of the list and notify listeners
    pub fn add_alert(&self, fields: NewAlert) -> Arc<Alert> {
        let alert = Arc::new(Alert::from_new(
            format!("alert-{}", Uuid::now_v7()),
            now_millis(),
            fields,
        ));

        let listeners = {
            let mut state = self.inner.state.lock();
            self.initialize_locked(&mut state);

            let mut next = Vec::with_capacity(state.alerts.len() + 1);
            next.push(Arc::clone(&alert));
            next.extend(state.alerts.iter().cloned());
            state.alerts = Arc::new(next);

            state.listeners.clone()
        };

        debug!(
            id = %alert.id,
            severity = %alert.severity,
            machine_id = %alert.machine_id,
            "Alert added"
        );

        notify(&listeners);
        alert
    }

    /// Mark an alert as acknowledged and notify listeners.
    ///
    /// Unknown ids are a no-op that still notifies; returns whether the id
    /// was present.
    pub fn acknowledge_alert(&self, id: &str) -> bool {
        let (found, listeners) = {
            let mut state = self.inner.state.lock();
            self.initialize_locked(&mut state);

            let found = match state.alerts.iter().position(|a| a.id == id) {
                Some(idx) => {
                    if !state.alerts[idx].acknowledged {
                        let mut next: Vec<Arc<Alert>> = state.alerts.as_ref().clone();
                        next[idx] = Arc::new(next[idx].acknowledged());
                        state.alerts = Arc::new(next);
                    }
                    true
                }
                None => false,
            };

            (found, state.listeners.clone())
        };

        if found {
            debug!(id, "Alert acknowledged");
        } else {
            debug!(id, "Acknowledge for unknown alert ignored");
        }

        notify(&listeners);
        found
    }

    /// Remove an alert and notify listeners.
    ///
    /// Unknown ids are a no-op that still notifies; returns whether the id
    /// was present.
    pub fn clear_alert(&self, id: &str) -> bool {
        let (found, listeners) = {
            let mut state = self.inner.state.lock();
            self.initialize_locked(&mut state);

            let found = state.alerts.iter().any(|a| a.id == id);
            if found {
                let next: Vec<Arc<Alert>> = state
                    .alerts
                    .iter()
                    .filter(|a| a.id != id)
                    .cloned()
                    .collect();
                state.alerts = Arc::new(next);
            }

            (found, state.listeners.clone())
        };

        if found {
            debug!(id, "Alert cleared");
        } else {
            debug!(id, "Clear for unknown alert ignored");
        }

        notify(&listeners);
        found
    }

    /// Number of alerts not yet acknowledged
    pub fn unacknowledged_count(&self) -> usize {
        self.inner
            .state
            .lock()
            .alerts
            .iter()
            .filter(|a| !a.acknowledged)
            .count()
    }
}

fn notify(listeners: &[Listener]) {
    for listener in listeners {
        listener();
    }
}

/// Registration returned by [`AlertStore::subscribe`]
pub struct Subscription {
    store: Weak<Inner>,
    listener: Listener,
}

impl Subscription {
    /// Deregister the listener. Returns false if it was already removed or
    /// the store is gone.
    pub fn unsubscribe(self) -> bool {
        let Some(inner) = self.store.upgrade() else {
            return false;
        };

        let mut state = inner.state.lock();
        let before = state.listeners.len();
        state.listeners.retain(|l| !Arc::ptr_eq(l, &self.listener));
        let removed = state.listeners.len() < before;

        if removed {
            debug!(listeners = state.listeners.len(), "Listener unsubscribed");
        }
        removed
    }
}
