//! stderr diagnostics for hooks.
//!
//! stdout belongs to the host, so every diagnostic goes to stderr. The filter
//! comes from `MEM0_LOG` (an `EnvFilter` directive) and defaults to `warn`.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "MEM0_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install the stderr subscriber. Safe to call more than once.
pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}
