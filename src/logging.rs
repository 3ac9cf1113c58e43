//! Diagnostic logging to stderr
//!
//! The filter comes from `DEVCHECK_LOG` (tracing `Targets` syntax, e.g.
//! `debug` or `device_checkup::probe=trace`), then from `log.level` in the
//! config, then falls back to `warn`.

use std::sync::Once;

use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "DEVCHECK_LOG";

static INIT_LOGGER: Once = Once::new();

/// Pick the filter from the environment value, then the configured level.
///
/// Unparseable values are skipped rather than treated as fatal.
pub fn resolve_filter(env_value: Option<&str>, configured: &str) -> Targets {
    [env_value, Some(configured)]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .find_map(|s| s.parse::<Targets>().ok())
        .unwrap_or_else(|| Targets::new().with_default(LevelFilter::WARN))
}

/// Install the stderr subscriber. Later calls are no-ops.
pub fn init(configured_level: &str) {
    INIT_LOGGER.call_once(|| {
        let env_value = std::env::var(LOG_ENV).ok();
        let targets = resolve_filter(env_value.as_deref(), configured_level);

        let layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(targets);

        // Another subscriber may already be installed (tests, embedding hosts)
        let _ = tracing_subscriber::registry().with(layer).try_init();
    });
}
