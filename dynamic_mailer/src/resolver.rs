//! Three-layer resolution of a variant's configuration.

use std::sync::Arc;

use crate::{
    ConfigMap, DefaultsSource, DynamicMailer, LayerStack, MailerError, MailerResult,
    MissingDefaults,
};

/// Resolves merged configuration for dynamic mailer variants.
///
/// The resolver owns a read-only [`DefaultsSource`] and holds no working
/// state between calls, so one resolver may serve concurrent resolutions.
///
/// # Examples
///
/// ```rust
/// use dynamic_mailer::{ConfigResolver, DynamicMailer, StaticDefaults, into_config_map};
/// use serde_json::json;
///
/// struct Plain;
/// impl DynamicMailer for Plain {
///     fn prefix(&self) -> &str {
///         "plain"
///     }
/// }
///
/// let defaults = StaticDefaults::new()
///     .with("plain", into_config_map(json!({"host": "a", "port": 25}))?);
/// let resolver = ConfigResolver::new(defaults);
/// let merged = resolver.resolve(&Plain, &into_config_map(json!({"port": 2525}))?)?;
/// assert_eq!(merged, into_config_map(json!({"host": "a", "port": 2525}))?);
/// # Ok::<_, std::sync::Arc<dynamic_mailer::MailerError>>(())
/// ```
#[derive(Clone, Debug)]
pub struct ConfigResolver<D> {
    defaults: D,
    missing: MissingDefaults,
}

impl<D: DefaultsSource> ConfigResolver<D> {
    /// Create a resolver that treats unknown prefixes as empty defaults.
    #[must_use]
    pub const fn new(defaults: D) -> Self {
        Self {
            defaults,
            missing: MissingDefaults::Empty,
        }
    }

    /// Choose how unknown prefixes are handled.
    #[must_use]
    pub fn with_missing_defaults(mut self, policy: MissingDefaults) -> Self {
        self.missing = policy;
        self
    }

    /// Returns the active missing-prefix policy.
    #[must_use]
    pub const fn missing_defaults(&self) -> MissingDefaults {
        self.missing
    }

    /// Borrow the defaults source.
    #[must_use]
    pub const fn defaults(&self) -> &D {
        &self.defaults
    }

    /// Look up the static defaults registered for `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`MailerError::Validation`] for an empty prefix,
    /// [`MailerError::ConfigNotFound`] for an unknown prefix under
    /// [`MissingDefaults::Error`], and any error raised by the source.
    pub fn resolve_defaults(&self, prefix: &str) -> MailerResult<ConfigMap> {
        if prefix.is_empty() {
            return Err(MailerError::validation_arc(
                "prefix",
                "variant prefix must not be empty",
            ));
        }
        match self.defaults.lookup(prefix)? {
            Some(defaults) => Ok(defaults),
            None => match self.missing {
                MissingDefaults::Empty => {
                    tracing::debug!(prefix, "no defaults registered; using an empty layer");
                    Ok(ConfigMap::new())
                }
                MissingDefaults::Error => Err(Arc::new(MailerError::not_found(prefix))),
            },
        }
    }

    /// Build the layer stack for `variant` without folding it.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`ConfigResolver::resolve_defaults`] and from
    /// the variant's options hook.
    pub fn layers<V>(&self, variant: &V, call_site: &ConfigMap) -> MailerResult<LayerStack>
    where
        V: DynamicMailer + ?Sized,
    {
        let prefix = variant.prefix();
        let defaults = self.resolve_defaults(prefix)?;
        let contribution = variant.subclass_options(call_site)?;
        let mut stack = LayerStack::new();
        stack.push_defaults(defaults);
        stack.push_variant(contribution);
        Ok(stack)
    }

    /// Resolve the merged configuration for `variant`.
    ///
    /// The variant's contribution overlays the defaults at every key level.
    /// Required keys are not validated here; the transport reports missing
    /// `host` or `port` when it is built.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`ConfigResolver::resolve_defaults`] and from
    /// the variant's options hook.
    pub fn resolve<V>(&self, variant: &V, call_site: &ConfigMap) -> MailerResult<ConfigMap>
    where
        V: DynamicMailer + ?Sized,
    {
        let span = tracing::debug_span!("resolve", prefix = variant.prefix());
        let _entered = span.enter();
        let merged = self.layers(variant, call_site)?.merge();
        tracing::debug!(
            keys = ?merged.keys().collect::<Vec<_>>(),
            "resolved dynamic mailer options"
        );
        Ok(merged)
    }
}
