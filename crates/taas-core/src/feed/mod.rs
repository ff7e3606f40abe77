//! Live feed: local copies of the backend collections
//!
//! Each collection is read in full once, then kept fresh by applying the
//! backend's change events. Fetch failures are captured on the state as a
//! message for display; nothing here retries.

mod insights;
mod machines;
mod simulated;
mod telemetry;

pub use insights::InsightFeed;
pub use machines::MachineSet;
pub use simulated::{SignalShape, SimulatedSeries, TelemetrySample};
pub use telemetry::TelemetryWindow;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Incremental change event from a backend collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "eventType", rename_all = "UPPERCASE")]
pub enum ChangeEvent<T> {
    /// A row was inserted
    Insert {
        /// Inserted row
        new: T,
    },
    /// A row was replaced
    Update {
        /// Row after the change
        new: T,
    },
    /// A row was removed
    Delete {
        /// Row as it was before removal
        old: T,
    },
}

/// Loading and error state around a local copy
#[derive(Debug, Clone, PartialEq)]
pub struct FeedState<T> {
    /// Current local copy
    pub items: T,
    /// True until the first fetch settles
    pub loading: bool,
    /// Message from the last failed fetch
    pub error: Option<String>,
}

impl<T: Default> Default for FeedState<T> {
    fn default() -> Self {
        Self {
            items: T::default(),
            loading: true,
            error: None,
        }
    }
}

impl<T> FeedState<T> {
    /// Settle a fetch: on success replace the items with `fill`'s result and
    /// clear the error, on failure keep the items and record the message
    pub fn settle<R, E>(&mut self, result: Result<R, E>, fill: impl FnOnce(&mut T, R))
    where
        E: std::fmt::Display,
    {
        self.loading = false;
        match result {
            Ok(rows) => {
                fill(&mut self.items, rows);
                self.error = None;
            }
            Err(e) => self.fail(e),
        }
    }

    /// Record a backend failure
    pub fn fail(&mut self, err: impl std::fmt::Display) {
        let message = err.to_string();
        warn!(error = %message, "Feed fetch failed");
        self.loading = false;
        self.error = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::Telemetry;

    #[test]
    fn test_change_event_wire_shape() {
        let raw = r#"{
            "eventType": "INSERT",
            "new": {
                "id": 7,
                "machine_id": "cnc-003",
                "timestamp": "2025-01-10T08:00:00Z",
                "vibration": 2.4,
                "temperature": 66.1,
                "energy_kwh": 1.2
            }
        }"#;
        let event: ChangeEvent<Telemetry> = serde_json::from_str(raw).unwrap();
        assert!(matches!(event, ChangeEvent::Insert { new } if new.id == 7));
    }

    #[test]
    fn test_fail_keeps_items() {
        let mut state: FeedState<Vec<u32>> = FeedState::default();
        state.settle(Ok::<_, Error>(vec![1, 2]), |items, rows| *items = rows);
        assert!(!state.loading);
        assert!(state.error.is_none());

        let reset = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset");
        state.settle(Err(Error::from(reset)), |items: &mut Vec<u32>, rows: Vec<u32>| *items = rows);
        assert_eq!(state.items, vec![1, 2]);
        assert_eq!(state.error.as_deref(), Some("IO error: connection reset"));
    }
}
