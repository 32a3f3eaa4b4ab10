//! The `custom` mailer variant.
//!
//! Its options hook branches on a call-site flag: with the flag set to any
//! non-null value the call-site options are passed on with TLS switched off,
//! otherwise the variant contributes credentials looked up by `mailer_id`.

use std::sync::Arc;

use dynamic_mailer::{ConfigMap, DynamicMailer, MailerError, MailerResult};
use serde_json::Value;

use crate::credentials::CredentialStore;

/// Prefix under which the variant's defaults are registered.
pub const PREFIX: &str = "custom";

/// Call-site flag that selects the passthrough branch.
pub const DYNAMIC_FLAG: &str = "flag_to_trigger_dynamic_behaviour";

/// Call-site key naming the credentials to look up.
pub const MAILER_ID: &str = "mailer_id";

/// Mailer variant backed by a credential store.
#[derive(Clone, Debug, Default)]
pub struct CustomMailer<S> {
    store: S,
}

impl<S: CredentialStore> CustomMailer<S> {
    /// Create the variant over `store`.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the credential store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    fn credentials_for(&self, call_site: &ConfigMap) -> MailerResult<ConfigMap> {
        let Some(mailer_id) = call_site.get(MAILER_ID).and_then(Value::as_str) else {
            return Ok(ConfigMap::new());
        };
        let found = self
            .store
            .credentials(mailer_id)
            .map_err(|err| Arc::new(MailerError::hook(PREFIX, err)))?;
        let mut options = ConfigMap::new();
        match found {
            Some(creds) => {
                tracing::debug!(mailer_id, "using stored credentials");
                options.insert("user".into(), Value::String(creds.user));
                options.insert("password".into(), Value::String(creds.password));
            }
            None => tracing::debug!(mailer_id, "no stored credentials"),
        }
        Ok(options)
    }
}

impl<S: CredentialStore> DynamicMailer for CustomMailer<S> {
    fn prefix(&self) -> &str {
        PREFIX
    }

    fn subclass_options(&self, call_site: &ConfigMap) -> MailerResult<ConfigMap> {
        if call_site.get(DYNAMIC_FLAG).is_some_and(|flag| !flag.is_null()) {
            let mut options = call_site.clone();
            options.remove(DYNAMIC_FLAG);
            options.insert("tls".into(), Value::Bool(false));
            return Ok(options);
        }
        self.credentials_for(call_site)
    }
}
