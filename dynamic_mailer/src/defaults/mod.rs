//! Sources of the static, prefix-scoped defaults layer.
//!
//! The defaults layer is an injected read-only dependency: resolvers ask a
//! [`DefaultsSource`] for the mapping registered under a variant prefix and
//! never write back. Three sources ship with the crate:
//!
//! - [`StaticDefaults`], an in-memory table keyed by prefix;
//! - [`FnDefaults`], wrapping any lookup closure; and
//! - [`FigmentDefaults`], reading `dynamic.<prefix>` from configuration files
//!   and environment variables through Figment.

mod figment_source;
mod parser;

use std::collections::BTreeMap;

pub use figment_source::FigmentDefaults;

use crate::{ConfigMap, MailerResult};

/// Read-only lookup of the defaults registered for a variant prefix.
pub trait DefaultsSource {
    /// Returns the mapping registered for `prefix`, or `None` when the prefix
    /// is unknown.
    ///
    /// # Errors
    ///
    /// Implementations return a [`crate::MailerError`] when the backing store
    /// cannot be read or holds a value that is not a mapping.
    fn lookup(&self, prefix: &str) -> MailerResult<Option<ConfigMap>>;
}

impl<T: DefaultsSource + ?Sized> DefaultsSource for &T {
    fn lookup(&self, prefix: &str) -> MailerResult<Option<ConfigMap>> {
        (**self).lookup(prefix)
    }
}

impl<T: DefaultsSource + ?Sized> DefaultsSource for std::sync::Arc<T> {
    fn lookup(&self, prefix: &str) -> MailerResult<Option<ConfigMap>> {
        (**self).lookup(prefix)
    }
}

/// Policy applied when no defaults are registered for a prefix.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MissingDefaults {
    /// Treat the defaults layer as an empty mapping.
    #[default]
    Empty,
    /// Fail with [`crate::MailerError::ConfigNotFound`].
    Error,
}

/// In-memory defaults keyed by prefix.
///
/// # Examples
///
/// ```rust
/// use dynamic_mailer::{DefaultsSource, StaticDefaults, into_config_map};
/// use serde_json::json;
///
/// let defaults = StaticDefaults::new()
///     .with("custom", into_config_map(json!({"host": "smtp.example.com"}))?);
/// assert!(defaults.lookup("custom")?.is_some());
/// assert!(defaults.lookup("billing")?.is_none());
/// # Ok::<_, std::sync::Arc<dynamic_mailer::MailerError>>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StaticDefaults {
    entries: BTreeMap<String, ConfigMap>,
}

impl StaticDefaults {
    /// Create an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Register `defaults` under `prefix`, returning the updated table.
    #[must_use]
    pub fn with(mut self, prefix: impl Into<String>, defaults: ConfigMap) -> Self {
        self.insert(prefix, defaults);
        self
    }

    /// Register `defaults` under `prefix`, replacing any previous entry.
    pub fn insert(&mut self, prefix: impl Into<String>, defaults: ConfigMap) {
        self.entries.insert(prefix.into(), defaults);
    }

    /// Build a table from a `{prefix: {...}}` mapping.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MailerError::Validation`] when an entry is not a
    /// mapping.
    pub fn from_map(table: ConfigMap) -> MailerResult<Self> {
        let mut defaults = Self::new();
        for (prefix, value) in table {
            let entry = crate::merge::into_config_map(value).map_err(|_| {
                crate::MailerError::validation_arc(
                    format!("dynamic.{prefix}"),
                    "defaults must be a mapping",
                )
            })?;
            defaults.insert(prefix, entry);
        }
        Ok(defaults)
    }

    /// Iterate over the registered prefixes.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl DefaultsSource for StaticDefaults {
    fn lookup(&self, prefix: &str) -> MailerResult<Option<ConfigMap>> {
        Ok(self.entries.get(prefix).cloned())
    }
}

/// Adapter exposing a lookup closure as a [`DefaultsSource`].
///
/// # Examples
///
/// ```rust
/// use dynamic_mailer::{DefaultsSource, FnDefaults, ConfigMap};
///
/// let source = FnDefaults(|prefix: &str| (prefix == "custom").then(ConfigMap::new));
/// assert!(source.lookup("custom")?.is_some());
/// # Ok::<_, std::sync::Arc<dynamic_mailer::MailerError>>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct FnDefaults<F>(pub F);

impl<F> DefaultsSource for FnDefaults<F>
where
    F: Fn(&str) -> Option<ConfigMap>,
{
    fn lookup(&self, prefix: &str) -> MailerResult<Option<ConfigMap>> {
        Ok((self.0)(prefix))
    }
}
