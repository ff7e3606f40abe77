//! Newest-first window over the `telemetry` collection

use std::collections::VecDeque;

use crate::config::FeedConfig;
use crate::models::Telemetry;

use super::ChangeEvent;

/// Default number of rows kept
pub const DEFAULT_CAPACITY: usize = 50;

/// Bounded, newest-first telemetry rows, optionally for one machine
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryWindow {
    machine_id: Option<String>,
    capacity: usize,
    rows: VecDeque<Telemetry>,
}

impl Default for TelemetryWindow {
    fn default() -> Self {
        Self::new(None, DEFAULT_CAPACITY)
    }
}

impl TelemetryWindow {
    /// Create an empty window
    pub fn new(machine_id: Option<String>, capacity: usize) -> Self {
        Self {
            machine_id,
            capacity,
            rows: VecDeque::with_capacity(capacity),
        }
    }

    /// Create an empty window sized by the feed configuration
    pub fn from_config(config: &FeedConfig, machine_id: Option<String>) -> Self {
        Self::new(machine_id, config.telemetry_window)
    }

    /// Replace the contents with a fetched page (already newest first)
    pub fn replace(&mut self, rows: Vec<Telemetry>) {
        let kept: VecDeque<Telemetry> = rows
            .into_iter()
            .filter(|r| self.accepts(r))
            .take(self.capacity)
            .collect();
        self.rows = kept;
    }

    fn accepts(&self, row: &Telemetry) -> bool {
        self.machine_id
            .as_deref()
            .map_or(true, |id| row.machine_id == id)
    }

    /// Apply one change event. Only inserts matter; returns whether the row
    /// entered the window.
    pub fn apply(&mut self, event: ChangeEvent<Telemetry>) -> bool {
        let ChangeEvent::Insert { new } = event else {
            return false;
        };
        if !self.accepts(&new) {
            return false;
        }

        self.rows.push_front(new);
        self.rows.truncate(self.capacity);
        true
    }

    /// Rows, newest first
    pub fn rows(&self) -> impl Iterator<Item = &Telemetry> {
        self.rows.iter()
    }

    /// Rows shown on a chart: all of them with real-time sync on, the five
    /// newest otherwise. Oldest first.
    pub fn chart_rows(&self, real_time_sync: bool) -> Vec<&Telemetry> {
        let shown = if real_time_sync { self.rows.len() } else { 5 };
        let mut rows: Vec<&Telemetry> = self.rows.iter().take(shown).collect();
        rows.reverse();
        rows
    }

    /// Number of rows held
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the window is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn row(id: i64, machine_id: &str) -> Telemetry {
        Telemetry {
            id,
            machine_id: machine_id.to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(id),
            vibration: 2.0,
            temperature: 65.0,
            energy_kwh: 1.0,
        }
    }

    #[test]
    fn test_insert_prepends_and_caps() {
        let mut window = TelemetryWindow::new(None, 3);
        for id in 0..5 {
            assert!(window.apply(ChangeEvent::Insert { new: row(id, "m1") }));
        }

        let ids: Vec<i64> = window.rows().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 3, 2]);
    }

    #[test]
    fn test_machine_filter() {
        let mut window = TelemetryWindow::new(Some("m1".to_string()), 10);
        assert!(!window.apply(ChangeEvent::Insert { new: row(1, "m2") }));
        assert!(window.apply(ChangeEvent::Insert { new: row(2, "m1") }));
        assert!(!window.apply(ChangeEvent::Update { new: row(2, "m1") }));
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_chart_rows_respect_sync() {
        let mut window = TelemetryWindow::default();
        window.replace((0..8).rev().map(|id| row(id, "m1")).collect());

        let synced: Vec<i64> = window.chart_rows(true).iter().map(|r| r.id).collect();
        assert_eq!(synced, (0..8).collect::<Vec<_>>());

        let throttled: Vec<i64> = window.chart_rows(false).iter().map(|r| r.id).collect();
        assert_eq!(throttled, vec![3, 4, 5, 6, 7]);
    }
}
