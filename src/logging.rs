//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

use crate::config::Settings;

/// Filter directive used when `RUST_LOG` is unset.
pub fn default_directive(settings: &Settings) -> String {
    if settings.debug {
        "debug".to_string()
    } else {
        settings.logging.level.clone()
    }
}

/// Install a stderr subscriber. `RUST_LOG` wins over the configured level.
///
/// Calling this more than once is harmless; only the first call installs.
pub fn init(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(settings)))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
