//! Constructors for `MailerError` variants that carry context.

use std::sync::Arc;

use super::MailerError;

impl MailerError {
    /// Construct a validation error for `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynamic_mailer::MailerError;
    /// let e = MailerError::validation("port", "expected an integer");
    /// assert!(matches!(e, MailerError::Validation { .. }));
    /// assert_eq!(e.to_string(), "Validation failed for 'port': expected an integer");
    /// ```
    #[must_use]
    pub fn validation(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Construct a [`MailerError::ConfigNotFound`] for `prefix`.
    #[must_use]
    pub fn not_found(prefix: impl Into<String>) -> Self {
        Self::ConfigNotFound {
            prefix: prefix.into(),
        }
    }

    /// Wrap an error raised inside a variant's options hook.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynamic_mailer::MailerError;
    /// let lookup = std::io::Error::other("credential store offline");
    /// let e = MailerError::hook("custom", lookup);
    /// assert!(e.to_string().contains("credential store offline"));
    /// ```
    #[must_use]
    pub fn hook(
        prefix: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Hook {
            prefix: prefix.into(),
            source: source.into(),
        }
    }

    /// Wrap a transport delivery failure.
    #[must_use]
    pub fn delivery(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Delivery {
            source: source.into(),
        }
    }

    /// Construct a validation error already wrapped in an [`Arc`].
    ///
    /// Saves call sites that return a [`crate::MailerResult`] from spelling out
    /// the `Arc::new` wrapper.
    #[must_use]
    pub fn validation_arc(key: impl Into<String>, message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::validation(key, message))
    }
}
