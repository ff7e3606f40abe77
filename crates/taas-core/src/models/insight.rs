//! Predictive insights from the backend `ai_insights` collection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fallback label when the machine join is empty
pub const UNKNOWN_MACHINE: &str = "Unknown Machine";

/// Name of the joined machine row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineRef {
    /// Machine display name
    pub name: String,
}

/// A model-generated prediction about a machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiInsight {
    /// Insight identifier
    pub id: String,
    /// Machine the prediction is about
    pub machine_id: String,
    /// Predicted failure category
    pub alert_type: String,
    /// Prediction text
    pub prediction_message: String,
    /// Model confidence in `[0, 1]`
    pub confidence_score: f64,
    /// When the prediction was made
    pub created_at: DateTime<Utc>,
    /// Joined machine row, as returned by the backend
    #[serde(default, rename = "machines", skip_serializing_if = "Option::is_none")]
    pub machine: Option<MachineRef>,
}

impl AiInsight {
    /// Joined machine name, or [`UNKNOWN_MACHINE`]
    pub fn machine_name(&self) -> &str {
        self.machine
            .as_ref()
            .map(|m| m.name.as_str())
            .unwrap_or(UNKNOWN_MACHINE)
    }
}
