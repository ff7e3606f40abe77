//! # TaaS
//!
//! Core of the TaaS Command Center, an operations dashboard for industrial
//! machines.
//!
//! ## Architecture
//!
//! - **Alerting**: in-memory alert store with copy-on-write snapshots and
//!   change listeners, fed by a timer-driven simulation
//! - **Feed**: local copies of the backend `machines`, `telemetry` and
//!   `ai_insights` collections, plus simulated telemetry
//! - **Settings**: feature toggles persisted in a named slot
//!
//! ## Quick Start
//!
//! ```bash
//! # Watch simulated alerts arrive
//! taas watch --interval-ms 1000
//!
//! # List the current alerts
//! taas alerts list
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod alerting;
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod settings;
pub mod time;

pub use config::Config;
pub use error::{Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::alerting::{AlertFilter, AlertStore, SeverityCounts, SimulationDriver, Snapshot};
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::models::*;
    pub use crate::settings::{Settings, SettingsStore};
}
