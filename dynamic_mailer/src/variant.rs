//! Variant hook support for dynamic mailers.
//!
//! This module provides the [`DynamicMailer`] trait that every mailer variant
//! implements. A variant names the prefix its defaults are registered under
//! and may compute part of its configuration at resolve time.

use crate::{ConfigMap, MailerResult};

/// A named mailer variant with an optional options hook.
///
/// # When to override the hook
///
/// The provided [`DynamicMailer::subclass_options`] passes the call-site
/// options through unchanged, so they overlay the static defaults directly.
/// Override it when the variant needs to:
///
/// - branch on flags supplied by the caller,
/// - remove flags it has consumed so they never reach the transport,
/// - look up values (credentials, hosts) keyed by call-site options, or
/// - contribute nothing at all, by returning an empty mapping.
///
/// # Examples
///
/// ```rust
/// use dynamic_mailer::{ConfigMap, DynamicMailer, MailerResult};
/// use serde_json::json;
///
/// struct Transactional;
///
/// impl DynamicMailer for Transactional {
///     fn prefix(&self) -> &str {
///         "transactional"
///     }
///
///     fn subclass_options(&self, call_site: &ConfigMap) -> MailerResult<ConfigMap> {
///         let mut options = call_site.clone();
///         if options.remove("use_backup").is_some() {
///             options.insert("host".into(), json!("backup.example.com"));
///         }
///         Ok(options)
///     }
/// }
///
/// let mut call_site = ConfigMap::new();
/// call_site.insert("use_backup".into(), json!(true));
/// let options = Transactional.subclass_options(&call_site)?;
/// assert_eq!(options.get("host"), Some(&json!("backup.example.com")));
/// assert!(!options.contains_key("use_backup"));
/// # Ok::<_, std::sync::Arc<dynamic_mailer::MailerError>>(())
/// ```
pub trait DynamicMailer {
    /// Prefix naming this variant's defaults (`dynamic.<prefix>`) and
    /// bindings.
    fn prefix(&self) -> &str;

    /// Compute this variant's contribution from the call-site options.
    ///
    /// The result overlays the static defaults. Implementations must not
    /// mutate shared state; reads from external stores are allowed.
    ///
    /// # Errors
    ///
    /// Returns an error when a lookup performed by the hook fails. The error
    /// reaches the caller of the resolution unchanged.
    fn subclass_options(&self, call_site: &ConfigMap) -> MailerResult<ConfigMap> {
        Ok(call_site.clone())
    }

    /// Names under which this variant's resources would be bound.
    fn bindings(&self) -> Bindings {
        Bindings::for_prefix(self.prefix())
    }
}

impl<T: DynamicMailer + ?Sized> DynamicMailer for &T {
    fn prefix(&self) -> &str {
        (**self).prefix()
    }

    fn subclass_options(&self, call_site: &ConfigMap) -> MailerResult<ConfigMap> {
        (**self).subclass_options(call_site)
    }

    fn bindings(&self) -> Bindings {
        (**self).bindings()
    }
}

/// Resource names derived from a variant prefix.
///
/// A variant exposes three roles: the application-facing mailer, the inner
/// message mailer it wraps and the transport underneath.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bindings {
    /// Name of the application-facing mailer (`<prefix>.dynamic.mailer`).
    pub mailer: String,
    /// Name of the inner message mailer (`<prefix>.dynamic.swift.mailer`).
    pub message_mailer: String,
    /// Name of the transport (`<prefix>.dynamic.swift.transport`).
    pub transport: String,
}

impl Bindings {
    /// Derive the binding names for `prefix`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dynamic_mailer::Bindings;
    ///
    /// let bindings = Bindings::for_prefix("custom");
    /// assert_eq!(bindings.mailer, "custom.dynamic.mailer");
    /// assert_eq!(bindings.message_mailer, "custom.dynamic.swift.mailer");
    /// assert_eq!(bindings.transport, "custom.dynamic.swift.transport");
    /// ```
    #[must_use]
    pub fn for_prefix(prefix: &str) -> Self {
        Self {
            mailer: format!("{prefix}.dynamic.mailer"),
            message_mailer: format!("{prefix}.dynamic.swift.mailer"),
            transport: format!("{prefix}.dynamic.swift.transport"),
        }
    }

    /// Iterate over every binding name, outermost role first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        [&self.mailer, &self.message_mailer, &self.transport]
            .into_iter()
            .map(String::as_str)
    }
}
