//! Tracing subscriber for the demo binary.
//!
//! Events go to standard error so the JSON report on standard output stays
//! machine readable. The filter is read from `DYNAMIC_MAILER_LOG` and falls
//! back to `info`.
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::Result;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "DYNAMIC_MAILER_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Build the filter from [`LOG_ENV`], defaulting to `info`.
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error when a global subscriber is already installed.
pub fn init() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .with(env_filter())
        .try_init()?;
    Ok(())
}
