//! Tracing subscriber initializer for binaries and tests.
//!
//! The library never calls this on its own — only `tracing::event!`/`span!`
//! calls are emitted from within the crate. A host binary or test harness
//! opts in by calling [`init_tracing`] once at startup, mirroring the
//! teacher's `main.rs` `EnvFilter` + `fmt` layer setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a global `tracing` subscriber reading its filter from
/// `RUST_LOG` (falling back to `info` when unset).
///
/// Safe to call more than once per process: subsequent calls are no-ops
/// if a global subscriber is already installed.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
