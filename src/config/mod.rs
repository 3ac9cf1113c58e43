//! Layered configuration
//!
//! Layers, lowest precedence first:
//! 1. Built-in defaults
//! 2. User config (~/.config/devcheck/config.toml)
//! 3. CLI flags (`--set key=value`, `--session`)

mod defaults;
mod effective;
mod merge;

pub use defaults::BuiltinDefaults;
pub use effective::{
    default_user_config_path, ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig,
    LogSettings, OutputFormat, OutputSettings, ProbeSettings, ResetSettings, SessionSettings,
    Settings,
};
pub use merge::{deep_merge, merge_layers, parse_override, set_path};
