//! Machine records from the backend `machines` collection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Operational state reported for a machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MachineStatus {
    /// Running normally
    #[default]
    Active,
    /// Reporting a fault
    Fault,
}

/// A monitored machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    /// Unique identifier
    pub id: String,
    /// Factory the machine belongs to
    pub factory_id: String,
    /// Display name
    pub name: String,
    /// Machine kind (e.g. "CNC", "Press")
    #[serde(rename = "type")]
    pub kind: String,
    /// Current status
    pub status: MachineStatus,
    /// When the machine was registered
    pub created_at: DateTime<Utc>,
}

impl Machine {
    /// Whether the machine currently reports a fault
    pub fn is_faulted(&self) -> bool {
        self.status == MachineStatus::Fault
    }
}
