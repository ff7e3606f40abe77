//! Pure projections over an alert snapshot: counts and filtered views

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::{Alert, Severity};

/// Per-severity and acknowledgement counts for a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    /// Alerts in the snapshot
    pub total: usize,
    /// Critical alerts
    pub critical: usize,
    /// Warning alerts
    pub warning: usize,
    /// Informational alerts
    pub info: usize,
    /// Alerts not yet acknowledged
    pub unacknowledged: usize,
}

impl SeverityCounts {
    /// Count a snapshot
    pub fn from_alerts(alerts: &[Arc<Alert>]) -> Self {
        alerts.iter().fold(Self::default(), |mut counts, alert| {
            counts.total += 1;
            match alert.severity {
                Severity::Critical => counts.critical += 1,
                Severity::Warning => counts.warning += 1,
                Severity::Info => counts.info += 1,
            }
            if !alert.acknowledged {
                counts.unacknowledged += 1;
            }
            counts
        })
    }

    /// Count for one severity
    pub fn for_severity(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::Warning => self.warning,
            Severity::Info => self.info,
        }
    }
}

/// Filtered view over a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertFilter {
    /// Only this severity (`None` = all)
    pub severity: Option<Severity>,
    /// Whether acknowledged alerts stay visible
    pub show_acknowledged: bool,
    /// Case-insensitive substring over title, machine and description
    pub query: String,
}

impl Default for AlertFilter {
    fn default() -> Self {
        Self {
            severity: None,
            show_acknowledged: true,
            query: String::new(),
        }
    }
}

impl AlertFilter {
    /// Whether a single alert passes the filter
    pub fn matches(&self, alert: &Alert) -> bool {
        self.matches_lowered(alert, &self.query.to_lowercase())
    }

    fn matches_lowered(&self, alert: &Alert, needle: &str) -> bool {
        if let Some(severity) = self.severity {
            if alert.severity != severity {
                return false;
            }
        }
        if !self.show_acknowledged && alert.acknowledged {
            return false;
        }
        alert.matches_query(needle)
    }

    /// Alerts that pass the filter, in snapshot order
    pub fn apply(&self, alerts: &[Arc<Alert>]) -> Vec<Arc<Alert>> {
        let needle = self.query.to_lowercase();
        alerts
            .iter()
            .filter(|a| self.matches_lowered(a, &needle))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerting::seed::sample_alerts;
    use pretty_assertions::assert_eq;

    fn samples() -> Vec<Arc<Alert>> {
        sample_alerts(1_000_000_000).into_iter().map(Arc::new).collect()
    }

    #[test]
    fn test_counts_for_samples() {
        let counts = SeverityCounts::from_alerts(&samples());
        assert_eq!(
            counts,
            SeverityCounts {
                total: 5,
                critical: 2,
                warning: 2,
                info: 1,
                unacknowledged: 3,
            }
        );
        assert_eq!(counts.for_severity(Severity::Info), 1);
    }

    #[test]
    fn test_default_filter_passes_everything() {
        let alerts = samples();
        assert_eq!(AlertFilter::default().apply(&alerts).len(), alerts.len());
    }

    #[test]
    fn test_severity_and_acknowledged_filters() {
        let filter = AlertFilter {
            severity: Some(Severity::Critical),
            show_acknowledged: false,
            ..AlertFilter::default()
        };
        let ids: Vec<_> = filter.apply(&samples()).iter().map(|a| a.id.clone()).collect();
        assert_eq!(ids, vec!["alert-001".to_string()]);
    }

    #[test]
    fn test_query_is_case_insensitive_over_three_fields() {
        let alerts = samples();
        let by = |q: &str| {
            AlertFilter {
                query: q.to_string(),
                ..AlertFilter::default()
            }
            .apply(&alerts)
            .len()
        };

        assert_eq!(by("BEARING"), 1);
        assert_eq!(by("compressor unit"), 1);
        assert_eq!(by("lubrication"), 1);
        assert_eq!(by("cnc-003"), 0);
    }
}
