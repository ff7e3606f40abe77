//! Telemetry rows from the backend `telemetry` collection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One sensor reading for a machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    /// Row identifier
    pub id: i64,
    /// Machine that produced the reading
    pub machine_id: String,
    /// Reading time
    pub timestamp: DateTime<Utc>,
    /// Vibration amplitude in mm/s
    pub vibration: f64,
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// Energy consumed in kWh
    pub energy_kwh: f64,
}
