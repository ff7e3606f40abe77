//! Data models for TaaS

mod alert;
mod insight;
mod machine;
mod telemetry;

pub use alert::*;
pub use insight::*;
pub use machine::*;
pub use telemetry::*;
