//! Logging setup
//!
//! Diagnostics go to stderr through `tracing`. The default filter is `warn`
//! so prompts and progress output stay readable; set `RUST_LOG=nestkit=debug`
//! to follow every stage, spawn and file write.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global subscriber
///
/// Uses compact human-readable output, or JSON lines when `NESTKIT_LOG_JSON`
/// is set.
///
/// # Errors
///
/// Returns an error if a global subscriber was already installed.
pub fn init() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if std::env::var_os("NESTKIT_LOG_JSON").is_some() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    Ok(())
}
