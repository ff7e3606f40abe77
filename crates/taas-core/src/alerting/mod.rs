//! Alerting for TaaS
//!
//! Holds the in-memory alert store, the timer-driven simulation that feeds
//! it, and the pure projections consumers compute over its snapshots.

mod filter;
mod seed;
mod simulation;
mod store;

pub use filter::{AlertFilter, SeverityCounts};
pub use seed::{sample_alerts, simulation_templates};
pub use simulation::{SimulationDriver, SimulationHandle, DEFAULT_INTERVAL};
pub use store::{empty_snapshot, global, AlertStore, Listener, Snapshot, Subscription};
