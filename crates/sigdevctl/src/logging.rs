//! Tracing setup for the sigdev binaries

use tracing_subscriber::EnvFilter;

/// Initialize the subscriber. `RUST_LOG` wins; otherwise info-level,
/// without targets, since these are short-lived CLI runs.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
