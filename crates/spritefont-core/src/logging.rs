use tracing_subscriber::EnvFilter;

/// Default filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,cosmic_text=warn,fontdb=warn";

/// Install the global `fmt` subscriber, honouring `RUST_LOG` when present.
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Install the global `fmt` subscriber with `filter` as the fallback directive.
///
/// Only binaries and examples should call this; library code just emits events.
pub fn init_with_filter(filter: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}
