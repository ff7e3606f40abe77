//! Configuration management for TaaS

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Environment variable prefix (`TAAS_SIMULATION__INTERVAL=5s`)
pub const ENV_PREFIX: &str = "TAAS";

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Alert simulation configuration
    pub simulation: SimulationConfig,

    /// Settings persistence configuration
    pub settings: SettingsConfig,

    /// Live feed configuration
    pub feed: FeedConfig,

    /// Telemetry simulation configuration
    pub telemetry: TelemetryConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from an optional file, then `TAAS_*` environment
    /// variables. Missing keys keep their defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!(path = %path.display(), "Reading configuration file");
            builder = builder.add_source(config::File::from(path).required(true));
        } else {
            builder = builder.add_source(config::File::with_name("taas").required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the runtime cannot use. Timer periods must be positive.
    pub fn validate(&self) -> Result<()> {
        let periods = [
            ("simulation.interval", self.simulation.interval),
            ("telemetry.temperature_interval", self.telemetry.temperature_interval),
            ("telemetry.vibration_interval", self.telemetry.vibration_interval),
        ];
        if let Some((key, _)) = periods.iter().find(|(_, period)| period.is_zero()) {
            return Err(Error::config(format!("{key} must be greater than zero")));
        }
        Ok(())
    }
}

/// Alert simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Whether the simulation driver runs when no backend feed is present
    pub enabled: bool,
    /// Period between simulated alerts
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(15),
        }
    }
}

/// Settings persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// Name of the storage slot holding the settings map
    pub slot: String,
    /// Directory holding slots (platform data dir if unset)
    pub directory: Option<PathBuf>,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            slot: "taas_settings".to_string(),
            directory: None,
        }
    }
}

impl SettingsConfig {
    /// Resolve the storage directory, falling back to the platform data dir
    pub fn resolve_directory(&self) -> PathBuf {
        if let Some(dir) = &self.directory {
            return dir.clone();
        }

        directories::ProjectDirs::from("io", "taas", "command-center")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".taas"))
    }
}

/// Live feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Maximum telemetry rows kept in a local window
    pub telemetry_window: usize,
    /// Maximum insights kept from a refetch
    pub insight_limit: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            telemetry_window: 50,
            insight_limit: 10,
        }
    }
}

/// Telemetry simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Sample period for the temperature signal
    #[serde(with = "humantime_serde")]
    pub temperature_interval: Duration,
    /// Sample period for the vibration signal
    #[serde(with = "humantime_serde")]
    pub vibration_interval: Duration,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            temperature_interval: Duration::from_secs(3),
            vibration_interval: Duration::from_secs(2),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (json or pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
