//! Credential stores consulted by the `custom` variant.
//!
//! Stores are keyed by a mailer identifier supplied at the call site. The
//! in-memory store suits tests and embedding; [`FigmentCredentials`] reads
//! `[credentials.<id>]` tables from the same configuration as the mail
//! defaults.

use std::collections::BTreeMap;

use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::CredentialError;

/// SMTP credentials for one mailer.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoredCredentials {
    /// Login name.
    pub user: String,
    /// Secret paired with `user`.
    pub password: String,
}

impl std::fmt::Debug for StoredCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredCredentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

impl StoredCredentials {
    /// Pair a user with a password.
    #[must_use]
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }
}

/// Read-only lookup of credentials by mailer identifier.
pub trait CredentialStore {
    /// Returns the credentials stored for `mailer_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`CredentialError`] when the store holds an entry that
    /// cannot be read.
    fn credentials(&self, mailer_id: &str)
    -> Result<Option<StoredCredentials>, CredentialError>;
}

impl<T: CredentialStore + ?Sized> CredentialStore for &T {
    fn credentials(
        &self,
        mailer_id: &str,
    ) -> Result<Option<StoredCredentials>, CredentialError> {
        (**self).credentials(mailer_id)
    }
}

/// Credentials held in memory.
///
/// # Examples
///
/// ```rust
/// use custom_mailer::credentials::{CredentialStore, MemoryCredentials, StoredCredentials};
///
/// let store = MemoryCredentials::default()
///     .with("billing", StoredCredentials::new("billing", "s3cret"));
/// assert!(store.credentials("billing").ok().flatten().is_some());
/// assert!(store.credentials("alerts").ok().flatten().is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryCredentials {
    entries: BTreeMap<String, StoredCredentials>,
}

impl MemoryCredentials {
    /// Register `credentials` under `mailer_id`, returning the store.
    #[must_use]
    pub fn with(mut self, mailer_id: impl Into<String>, credentials: StoredCredentials) -> Self {
        self.entries.insert(mailer_id.into(), credentials);
        self
    }
}

impl CredentialStore for MemoryCredentials {
    fn credentials(
        &self,
        mailer_id: &str,
    ) -> Result<Option<StoredCredentials>, CredentialError> {
        Ok(self.entries.get(mailer_id).cloned())
    }
}

/// Credentials read from `credentials.<id>` in a [`Figment`].
#[derive(Clone, Debug)]
pub struct FigmentCredentials {
    figment: Figment,
}

impl FigmentCredentials {
    /// Read credentials from `figment`.
    #[must_use]
    pub const fn new(figment: Figment) -> Self {
        Self { figment }
    }
}

impl CredentialStore for FigmentCredentials {
    fn credentials(
        &self,
        mailer_id: &str,
    ) -> Result<Option<StoredCredentials>, CredentialError> {
        let key = format!("credentials.{mailer_id}");
        if !self.figment.contains(&key) {
            return Ok(None);
        }
        self.figment
            .extract_inner(&key)
            .map(Some)
            .map_err(|err| CredentialError::Lookup {
                mailer_id: mailer_id.to_owned(),
                source: Box::new(err),
            })
    }
}
