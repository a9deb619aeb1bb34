use tracing_subscriber::{fmt, EnvFilter};

/// Build the filter: `RUST_LOG` when set, otherwise the configured level.
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Safe to call more than once; later calls are ignored.
pub fn init(level: &str) {
    let _ = fmt()
        .with_env_filter(build_filter(level))
        .with_target(true)
        .try_init();
}
