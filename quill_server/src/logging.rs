//! Structured logging configuration.
//!
//! Log levels are configurable via the `RUST_LOG` environment variable;
//! sqlx and hyper chatter is dampened by default.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// # Example
///
/// ```no_run
/// use quill_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log a security event with structured data
///
/// # Example
///
/// ```
/// use quill_server::logging::log_security_event;
///
/// log_security_event("failed_login", "Invalid password attempt");
/// ```
pub fn log_security_event(event_type: &str, message: &str) {
    tracing::warn!(event_type = event_type, "SECURITY: {}", message);
}
