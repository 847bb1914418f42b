//! Diagnostic logging to stderr.
//!
//! `RUST_LOG` wins when set; otherwise `-v` flags raise the level from `warn`.
//! Stdout is reserved for tables and exports.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: u8) {
    let filter = std::env::var("RUST_LOG").map_or_else(
        |_| EnvFilter::new(default_directive(verbose)),
        |directive| EnvFilter::new(&directive),
    );
    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}
