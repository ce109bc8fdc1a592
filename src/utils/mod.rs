use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Installs the global fmt subscriber once per process.
///
/// `RUST_LOG` takes precedence over `default_filter`. A subscriber installed elsewhere
/// is left in place.
pub fn init_tracing(default_filter: &str) {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));
        let _ = fmt().with_env_filter(filter).try_init();
    });
}
