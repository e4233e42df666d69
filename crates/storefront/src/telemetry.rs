//! Tracing initialisation for the embedding shell.
//!
//! The storefront core is a library, so the application root owns startup.
//! Call [`init`] once before constructing the app to get an `EnvFilter`-driven
//! fmt subscriber; `RUST_LOG` overrides the default level.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// Defaults to info level for this crate if `RUST_LOG` is not set. Calling
/// it more than once (e.g. from several tests) is a no-op.
pub fn init() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "organic_oils_storefront=info".into());

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
