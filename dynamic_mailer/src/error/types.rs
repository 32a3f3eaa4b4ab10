//! Primary error enum for mailer resolution flows.

use thiserror::Error;

/// Boxed error reported by collaborators the crate does not own.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while resolving or using a dynamic mailer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MailerError {
    /// No static defaults are registered for the requested prefix.
    #[error("no dynamic mailer defaults registered for prefix '{prefix}'")]
    ConfigNotFound {
        /// Variant prefix that had no defaults.
        prefix: String,
    },

    /// Error originating from a defaults file.
    #[error("Configuration file error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: std::path::PathBuf,
        /// Underlying error reported while reading or parsing the file.
        #[source]
        source: BoxedSource,
    },

    /// Error while extracting defaults from Figment providers.
    #[error("Failed to gather configuration: {0}")]
    Gathering(#[from] Box<figment::Error>),

    /// A merged mapping could not be interpreted as the requested type.
    #[error("Failed to interpret configuration: {0}")]
    Deserialize(#[from] Box<serde_json::Error>),

    /// A configuration value is missing or has the wrong shape.
    #[error("Validation failed for '{key}': {message}")]
    Validation {
        /// Configuration key that failed validation.
        key: String,
        /// Human-readable explanation of the failure.
        message: String,
    },

    /// A variant's options hook failed.
    #[error("options hook for '{prefix}' failed: {source}")]
    Hook {
        /// Prefix of the variant whose hook failed.
        prefix: String,
        /// Error returned by the hook's own lookups.
        #[source]
        source: BoxedSource,
    },

    /// The SMTP transport rejected its configuration.
    #[error("SMTP transport error: {0}")]
    Transport(#[from] Box<lettre::transport::smtp::Error>),

    /// A global address could not be parsed.
    #[error("invalid mail address: {0}")]
    Address(#[from] Box<lettre::address::AddressError>),

    /// A message envelope could not be built.
    #[error("failed to build message: {0}")]
    Message(#[from] Box<lettre::error::Error>),

    /// The transport failed to deliver a message.
    #[error("failed to deliver message: {source}")]
    Delivery {
        /// Error reported by the transport.
        #[source]
        source: BoxedSource,
    },
}
