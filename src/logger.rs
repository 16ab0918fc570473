//! Tracing initialisation helpers.

use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "recipe_book=debug";

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise every crate log at
/// debug level is emitted. Repeat calls are ignored so test binaries can
/// initialise freely.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = fmt().with_env_filter(filter).try_init();
}
