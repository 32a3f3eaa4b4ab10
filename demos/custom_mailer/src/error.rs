//! Error types for the `custom-mailer` demo.
//!
//! `DemoError` wraps library failures alongside the demo's own command-line
//! and output problems so `main` can hand a single error to `color-eyre`.
use std::sync::Arc;

use dynamic_mailer::MailerError;
use thiserror::Error;

/// Convenience alias for results produced by the demo.
pub type Result<T> = std::result::Result<T, DemoError>;

/// Errors raised by the `custom-mailer` demo.
#[derive(Debug, Error)]
pub enum DemoError {
    /// Wraps resolution, transport and delivery failures from `dynamic_mailer`.
    #[error("mailer error: {0}")]
    Mailer(#[from] Arc<MailerError>),
    /// Writing the report to standard output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
    /// The tracing subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}

/// Problems with a `--set KEY=VALUE` argument.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverrideError {
    /// The argument has no `=` separator.
    #[error("expected KEY=VALUE, got '{0}'")]
    MissingSeparator(String),
    /// The key, or one of its dotted segments, is empty.
    #[error("override key '{0}' has an empty segment")]
    EmptyKey(String),
}

/// Failures reported by a credential store.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The stored entry could not be read.
    #[error("failed to read credentials for '{mailer_id}': {source}")]
    Lookup {
        /// Identifier that was looked up.
        mailer_id: String,
        /// Error reported by the backing configuration.
        #[source]
        source: Box<figment::Error>,
    },
}
