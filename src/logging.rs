//! Diagnostic logging setup.
//!
//! Installs a `tracing-subscriber` registry writing to stderr so diagnostics
//! never mix with command output on stdout. The filter comes from
//! `RUST_LOG` when set, otherwise from `logging.level` (which `SENTI_LOG`
//! already overrides during config loading).

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::schema::{LogFormat, LoggingConfig};

/// Install the global subscriber. Safe to call more than once; later calls
/// are no-ops.
pub fn init(config: &LoggingConfig) {
    let filter = resolve_filter(config);

    let result = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    if result.is_ok() {
        tracing::debug!(level = %config.level, format = %config.format, "logging initialized");
    }
}

/// Pick the filter directive: `RUST_LOG` first, then the config level,
/// falling back to `warn` for an unparsable level.
fn resolve_filter(config: &LoggingConfig) -> EnvFilter {
    if let Ok(directive) = std::env::var("RUST_LOG")
        && let Ok(filter) = EnvFilter::try_new(&directive)
    {
        return filter;
    }

    EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("warn"))
}
