//! Dashboard settings persisted as a flat key→bool map in a named slot
//!
//! The slot is a JSON object stored as `<slot>.json`. Loading merges the
//! stored values over the defaults; keys we don't know are kept and written
//! back on save but never exposed as settings.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::SettingsConfig;
use crate::error::{Error, Result};

/// Typed view of the known settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Notify on critical alerts
    pub critical_alerts: bool,
    /// Notify on warning alerts
    pub warning_alerts: bool,
    /// Send maintenance reminders
    pub maintenance_reminders: bool,
    /// Send a daily email digest
    pub email_digest: bool,
    /// Stream live data instead of a short recent window
    pub real_time_sync: bool,
    /// Render charts at full detail
    pub high_fidelity_rendering: bool,
    /// Overlay predicted values on charts
    pub predictive_overlay: bool,
    /// Take part in federated model training
    pub federated_learning: bool,
    /// Add privacy noise to shared data
    pub differential_privacy: bool,
    /// Consent to sharing anonymized data
    pub data_sharing_consent: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            critical_alerts: true,
            warning_alerts: true,
            maintenance_reminders: false,
            email_digest: false,
            real_time_sync: true,
            high_fidelity_rendering: true,
            predictive_overlay: false,
            federated_learning: true,
            differential_privacy: true,
            data_sharing_consent: false,
        }
    }
}

impl Settings {
    /// Wire names of every known setting
    pub const KEYS: [&'static str; 10] = [
        "criticalAlerts",
        "warningAlerts",
        "maintenanceReminders",
        "emailDigest",
        "realTimeSync",
        "highFidelityRendering",
        "predictiveOverlay",
        "federatedLearning",
        "differentialPrivacy",
        "dataSharingConsent",
    ];

    /// Key/value pairs in [`Settings::KEYS`] order
    pub fn entries(&self) -> [(&'static str, bool); 10] {
        [
            ("criticalAlerts", self.critical_alerts),
            ("warningAlerts", self.warning_alerts),
            ("maintenanceReminders", self.maintenance_reminders),
            ("emailDigest", self.email_digest),
            ("realTimeSync", self.real_time_sync),
            ("highFidelityRendering", self.high_fidelity_rendering),
            ("predictiveOverlay", self.predictive_overlay),
            ("federatedLearning", self.federated_learning),
            ("differentialPrivacy", self.differential_privacy),
            ("dataSharingConsent", self.data_sharing_consent),
        ]
    }

    /// Whether `key` names a known setting
    pub fn is_known(key: &str) -> bool {
        Self::KEYS.contains(&key)
    }

    fn default_for(key: &str) -> Option<bool> {
        Self::default()
            .entries()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }
}

/// Settings bound to their storage slot
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl SettingsStore {
    /// Open the slot described by the configuration
    pub fn open(config: &SettingsConfig) -> Self {
        Self::load(config.resolve_directory(), &config.slot)
    }

    /// Load `<dir>/<slot>.json`, merged over the defaults.
    ///
    /// A missing slot yields the defaults. A malformed slot is logged and
    /// also yields the defaults.
    pub fn load(dir: impl AsRef<Path>, slot: &str) -> Self {
        let path = dir.as_ref().join(format!("{slot}.json"));
        let mut values = default_values();

        match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(stored)) => merge_stored(&mut values, stored),
                Ok(other) => {
                    warn!(path = %path.display(), kind = json_kind(&other), "Settings slot is not an object, using defaults");
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse settings, using defaults");
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No stored settings, using defaults");
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read settings, using defaults");
            }
        }

        Self { path, values }
    }

    /// Path of the backing slot
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Typed view of the known settings
    pub fn settings(&self) -> Settings {
        serde_json::from_value(Value::Object(self.values.clone())).unwrap_or_default()
    }

    /// Value of a known setting
    pub fn get(&self, key: &str) -> Option<bool> {
        if !Settings::is_known(key) {
            return None;
        }
        self.values.get(key).and_then(Value::as_bool)
    }

    /// Keys in the slot that no current setting uses
    pub fn extra_keys(&self) -> Vec<&str> {
        self.values
            .keys()
            .map(String::as_str)
            .filter(|k| !Settings::is_known(k))
            .collect()
    }

    /// Change a known setting and persist the slot
    pub fn set(&mut self, key: &str, value: bool) -> Result<()> {
        if !Settings::is_known(key) {
            return Err(Error::validation(format!("unknown setting '{key}'")));
        }

        let previous = self.values.insert(key.to_string(), Value::Bool(value));
        if let Err(e) = self.save() {
            match previous {
                Some(old) => self.values.insert(key.to_string(), old),
                None => self.values.remove(key),
            };
            return Err(e);
        }

        debug!(key, value, "Setting updated");
        Ok(())
    }

    /// Write the slot, including any extra keys it was loaded with
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

fn default_values() -> Map<String, Value> {
    Settings::default()
        .entries()
        .into_iter()
        .map(|(k, v)| (k.to_string(), Value::Bool(v)))
        .collect()
}

fn merge_stored(values: &mut Map<String, Value>, stored: Map<String, Value>) {
    for (key, value) in stored {
        match Settings::default_for(&key) {
            Some(default) if !value.is_boolean() => {
                warn!(key = %key, "Setting is not a boolean, keeping default");
                values.insert(key, Value::Bool(default));
            }
            _ => {
                values.insert(key, value);
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
