//! Diagnostic logging setup.
//!
//! Events go to stderr so stdout stays clean for command output. The filter
//! comes from `TALLER_LOG` (same syntax as `RUST_LOG`), defaulting to `warn`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub const LOG_ENV: &str = "TALLER_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Builds the filter from `TALLER_LOG`, or the default when unset or invalid.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. Calling it twice is a no-op.
pub fn init() {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init();
        init();
    }
}
