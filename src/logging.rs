//! Diagnostic logging for the CLI.
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to binaries. The CLI logs to stderr so that markup and listings on stdout
//! stay pipeable.
//!
//! The level is controlled with `RUST_LOG`:
//! - `RUST_LOG=responsive_sets=debug responsive-sets render Hero ...` (every rendition)
//! - unset: warnings only, or `info` with `--verbose`

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "responsive_sets=info"
    } else {
        "responsive_sets=warn"
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init();
}
