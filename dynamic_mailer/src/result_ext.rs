//! Extensions for mapping errors to `MailerResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| Arc::new(MailerError::from(e)))`
//! patterns when converting external error types into the crate's
//! `MailerResult<T>` alias (`Result<T, Arc<MailerError>>`).
//!
//! # Examples
//!
//! ```
//! use dynamic_mailer::{MailerResult, MailerResultExt};
//!
//! fn port() -> MailerResult<u16> {
//!     // serde_json::Error implements Into<MailerError>
//!     serde_json::from_str("2525").into_mailer()
//! }
//! assert_eq!(port().ok(), Some(2525));
//! ```

use std::sync::Arc;

use crate::{MailerError, MailerResult};

/// Generic extension for mapping any `Result<T, E>` with `E: Into<MailerError>`
/// into a `MailerResult<T>`.
pub trait MailerResultExt<T, E> {
    /// Convert `Result<T, E>` into `MailerResult<T>` using `Into<MailerError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into `Arc<MailerError>`.
    fn into_mailer(self) -> MailerResult<T>;
}

impl<T, E> MailerResultExt<T, E> for Result<T, E>
where
    E: Into<MailerError>,
{
    fn into_mailer(self) -> MailerResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}
