//! Tracing subscriber setup for the `wpg` binary.
//!
//! Logs go to stderr so grid tables and summaries on stdout stay pipeable.
//! The filter comes from `RUST_LOG` and falls back to `info`.

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter);

    // `try_init` fails only if a subscriber is already set (tests, embedding).
    let _ = tracing_subscriber::registry().with(stderr_layer).try_init();
}
