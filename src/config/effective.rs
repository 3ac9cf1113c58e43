//! Effective configuration with provenance
//!
//! Captures the merged configuration, the typed settings read from it, and
//! where each contributing layer came from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::defaults::BuiltinDefaults;
use super::merge::merge_layers;

/// Schema identifier
pub const SCHEMA_ID: &str = "device-checkup/effective_config@1";

/// Upper bound for probe.interval_ms
const MAX_PROBE_INTERVAL_MS: u64 = 10_000;

/// Upper bound for probe.duration_ms
const MAX_PROBE_DURATION_MS: u64 = 600_000;

/// Origin of a configuration source
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    User,
    Cli,
}

/// A contributing config source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 of the raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// How command output is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Human,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    pub path: PathBuf,
    pub persist: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetSettings {
    pub confirm: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeSettings {
    pub simulate: bool,
    pub interval_ms: u64,
    pub duration_ms: u64,
}

impl ProbeSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    pub level: String,
}

/// Typed view over the merged configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub session: SessionSettings,
    pub reset: ResetSettings,
    pub output: OutputSettings,
    pub probe: ProbeSettings,
    pub log: LogSettings,
}

/// Effective configuration with provenance
#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub schema_id: String,

    /// When this config was computed
    pub created_at: DateTime<Utc>,

    /// The merged configuration object
    pub config: Value,

    /// Typed settings read from `config`
    #[serde(skip)]
    pub settings: Settings,

    /// Contributing sources in precedence order
    pub sources: Vec<ConfigSource>,
}

/// Location of the per-user config file
pub fn default_user_config_path() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(xdg).join("devcheck/config.toml"));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config/devcheck/config.toml"))
}

impl EffectiveConfig {
    /// Build the effective config from builtin defaults, an optional user
    /// file and optional CLI overrides.
    ///
    /// A user path that does not exist is skipped.
    pub fn build(
        user_config_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<Self, ConfigError> {
        let mut layers = vec![BuiltinDefaults::default().to_value()];
        let mut sources = vec![ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        }];

        if let Some(path) = user_config_path.filter(|p| p.exists()) {
            let (value, digest) = Self::load_toml_file(path)?;
            layers.push(value);
            sources.push(ConfigSource {
                origin: ConfigOrigin::User,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            });
        }

        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers);
        let settings = Self::validate(&merged)?;

        Ok(Self {
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            config: merged,
            settings,
            sources,
        })
    }

    /// Load and parse a TOML file, returning the value and its digest
    fn load_toml_file(path: &Path) -> Result<(Value, String), ConfigError> {
        let bytes = fs::read(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        let digest = hex::encode(Sha256::digest(&bytes));

        let contents = String::from_utf8(bytes)
            .map_err(|e| ConfigError::ParseError(format!("Invalid UTF-8: {}", e)))?;

        // toml::Value -> serde_json::Value goes through serde directly
        let value: Value = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;

        Ok((value, digest))
    }

    /// Read typed settings and check value ranges
    fn validate(config: &Value) -> Result<Settings, ConfigError> {
        let settings: Settings = serde_json::from_value(config.clone())
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        if settings.probe.interval_ms == 0 || settings.probe.interval_ms > MAX_PROBE_INTERVAL_MS {
            return Err(ConfigError::ValidationError(format!(
                "probe.interval_ms must be in (0, {}]",
                MAX_PROBE_INTERVAL_MS
            )));
        }

        if settings.probe.duration_ms > MAX_PROBE_DURATION_MS {
            return Err(ConfigError::ValidationError(format!(
                "probe.duration_ms must be at most {}",
                MAX_PROBE_DURATION_MS
            )));
        }

        if settings.session.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "session.path must not be empty".to_string(),
            ));
        }

        Ok(settings)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Get a config value by dot-separated path
    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('.').try_fold(&self.config, |current, part| current.get(part))
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
