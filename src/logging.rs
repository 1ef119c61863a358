//! Logger setup
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies.

use crate::config::LoggingConfig;

/// Install the global logger. Safe to call more than once; later calls are
/// ignored.
pub fn init_logging(config: &LoggingConfig) {
    let level = config
        .level
        .parse::<log::LevelFilter>()
        .unwrap_or(log::LevelFilter::Info);

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    if builder.try_init().is_ok() {
        log::info!("[init_logging] Logging initialized at {}", level);
    }
}
