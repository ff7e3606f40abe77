//! Alert data models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Alert severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational
    Info,
    /// Warning
    Warning,
    /// Critical
    Critical,
}

impl Severity {
    /// All severities, most urgent first
    pub const ALL: [Severity; 3] = [Severity::Critical, Severity::Warning, Severity::Info];

    /// Urgency rank (higher is more urgent)
    pub fn rank(self) -> u8 {
        match self {
            Self::Info => 0,
            Self::Warning => 1,
            Self::Critical => 2,
        }
    }

    /// Lowercase wire name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "critical" => Ok(Self::Critical),
            other => Err(Error::validation(format!("unknown severity '{other}'"))),
        }
    }
}

/// The measured quantity behind a quantitative alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Label of the measured quantity (e.g. "Vibration")
    pub metric: String,
    /// Observed value
    pub value: f64,
    /// Threshold the value is judged against
    pub threshold: f64,
}

impl Measurement {
    /// Create a new measurement
    pub fn new(metric: impl Into<String>, value: f64, threshold: f64) -> Self {
        Self {
            metric: metric.into(),
            value,
            threshold,
        }
    }

    /// Gauge fill in `[0, 1]`; full scale is 1.5x the threshold
    pub fn fill_ratio(&self) -> f64 {
        if self.threshold <= 0.0 {
            return 0.0;
        }
        (self.value / (self.threshold * 1.5)).clamp(0.0, 1.0)
    }
}

/// Fields supplied by the caller when raising an alert.
///
/// The store allocates `id`, `timestamp` and `acknowledged`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlert {
    /// Severity level
    pub severity: Severity,
    /// Display name of the machine
    pub machine: String,
    /// Machine identifier
    pub machine_id: String,
    /// Short headline
    pub title: String,
    /// Human-readable detail
    pub description: String,
    /// Reading that triggered the alert, if any
    #[serde(flatten)]
    pub measurement: Option<Measurement>,
}

impl NewAlert {
    /// Create alert fields without a measurement
    pub fn new(
        severity: Severity,
        machine: impl Into<String>,
        machine_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            machine: machine.into(),
            machine_id: machine_id.into(),
            title: title.into(),
            description: description.into(),
            measurement: None,
        }
    }

    /// Attach the measured quantity that triggered the alert
    pub fn with_measurement(mut self, metric: impl Into<String>, value: f64, threshold: f64) -> Self {
        self.measurement = Some(Measurement::new(metric, value, threshold));
        self
    }

    /// Check the fields an outer surface hands us before they reach the store
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::validation("alert title must not be empty"));
        }
        if self.machine.trim().is_empty() {
            return Err(Error::validation("alert machine must not be empty"));
        }
        if self.machine_id.trim().is_empty() {
            return Err(Error::validation("alert machineId must not be empty"));
        }
        if let Some(m) = &self.measurement {
            if m.metric.trim().is_empty() {
                return Err(Error::validation("measurement metric must not be empty"));
            }
            if !m.value.is_finite() || !m.threshold.is_finite() {
                return Err(Error::validation(format!(
                    "measurement '{}' must have finite value and threshold",
                    m.metric
                )));
            }
        }
        Ok(())
    }
}

/// One detected condition on a machine.
///
/// Only `acknowledged` changes after creation, and only from false to true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Unique for the lifetime of the process
    pub id: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Severity level
    pub severity: Severity,
    /// Display name of the machine
    pub machine: String,
    /// Machine identifier
    pub machine_id: String,
    /// Short headline
    pub title: String,
    /// Human-readable detail
    pub description: String,
    /// Reading that triggered the alert, if any
    #[serde(flatten)]
    pub measurement: Option<Measurement>,
    /// Whether an operator has acknowledged it
    pub acknowledged: bool,
}

impl Alert {
    /// Build a record from caller fields
    pub fn from_new(id: impl Into<String>, timestamp: i64, fields: NewAlert) -> Self {
        Self {
            id: id.into(),
            timestamp,
            severity: fields.severity,
            machine: fields.machine,
            machine_id: fields.machine_id,
            title: fields.title,
            description: fields.description,
            measurement: fields.measurement,
            acknowledged: false,
        }
    }

    /// Copy of this record with `acknowledged` set
    pub fn acknowledged(&self) -> Self {
        Self {
            acknowledged: true,
            ..self.clone()
        }
    }

    /// Case-insensitive substring match over title, machine and description.
    /// `needle` must already be lowercase.
    pub fn matches_query(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.machine.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn coolant() -> NewAlert {
        NewAlert::new(
            Severity::Critical,
            "Grinding Station #3",
            "gs-003",
            "Coolant Level Critical",
            "Coolant reservoir at 12%.",
        )
        .with_measurement("Coolant Level", 12.0, 20.0)
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert_eq!("CRITICAL".parse::<Severity>().unwrap(), Severity::Critical);
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn test_wire_shape_is_flat_camel_case() {
        let alert = Alert::from_new("alert-x", 1_700_000_000_000, coolant());
        let json = serde_json::to_value(&alert).unwrap();

        assert_eq!(json["machineId"], "gs-003");
        assert_eq!(json["metric"], "Coolant Level");
        assert_eq!(json["threshold"], 20.0);
        assert_eq!(json["severity"], "critical");
        assert_eq!(json["acknowledged"], false);
    }

    #[test]
    fn test_measurement_absent_when_not_quantitative() {
        let raw = r#"{
            "severity": "info",
            "machine": "Assembly Line #1",
            "machineId": "al-001",
            "title": "Efficiency Optimized",
            "description": "Cycle time adjusted."
        }"#;
        let fields: NewAlert = serde_json::from_str(raw).unwrap();
        assert!(fields.measurement.is_none());
        assert!(fields.validate().is_ok());

        let json = serde_json::to_value(&fields).unwrap();
        assert!(json.get("metric").is_none());
    }

    #[test]
    fn test_validate_rejects_blank_and_non_finite() {
        let mut fields = coolant();
        fields.title = "  ".to_string();
        assert!(matches!(fields.validate(), Err(Error::Validation(_))));

        let fields = coolant().with_measurement("Coolant Level", f64::NAN, 20.0);
        assert!(fields.validate().is_err());
    }

    #[test]
    fn test_fill_ratio() {
        assert_eq!(Measurement::new("Vibration", 4.5, 3.0).fill_ratio(), 1.0);
        assert!((Measurement::new("Temperature", 78.0, 75.0).fill_ratio() - 78.0 / 112.5).abs() < 1e-9);
        assert_eq!(Measurement::new("Odd", 5.0, 0.0).fill_ratio(), 0.0);
    }

    #[test]
    fn test_acknowledged_copy_keeps_identity() {
        let alert = Alert::from_new("alert-x", 1, coolant());
        let acked = alert.acknowledged();
        assert!(acked.acknowledged);
        assert_eq!(acked.id, alert.id);
        assert_eq!(acked.measurement, alert.measurement);
    }
}
