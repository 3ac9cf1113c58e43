//! Built-in defaults (layer 1)
//!
//! Hardcoded defaults for all configuration values.

use serde::{Deserialize, Serialize};

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Session file, relative paths resolve against the working directory
    pub session_path: String,

    /// Save the session after every change (default: true)
    pub session_persist: bool,

    /// Require explicit confirmation before reset (default: true)
    pub reset_confirm: bool,

    /// Output format: "human" or "json" (default: "human")
    pub output_format: String,

    /// Use scripted probes when no hardware is attached (default: true)
    pub probe_simulate: bool,

    /// Interval between probe readings in milliseconds (default: 100)
    pub probe_interval_ms: u64,

    /// How long `run` streams readings before asking for a verdict (default: 3000)
    pub probe_duration_ms: u64,

    /// Log filter when DEVCHECK_LOG is unset (default: "warn")
    pub log_level: String,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            session_path: ".devcheck/session.json".to_string(),
            session_persist: true,
            reset_confirm: true,
            output_format: "human".to_string(),
            probe_simulate: true,
            probe_interval_ms: 100,
            probe_duration_ms: 3000,
            log_level: "warn".to_string(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "session": {
                "path": self.session_path,
                "persist": self.session_persist
            },
            "reset": {
                "confirm": self.reset_confirm
            },
            "output": {
                "format": self.output_format
            },
            "probe": {
                "simulate": self.probe_simulate,
                "interval_ms": self.probe_interval_ms,
                "duration_ms": self.probe_duration_ms
            },
            "log": {
                "level": self.log_level
            }
        })
    }
}
