//! Plain factory producing mailers for one variant.

use lettre::{SmtpTransport, Transport};

use crate::{
    ConfigMap, ConfigResolver, DefaultsSource, DynamicMailer, GlobalAddresses, Mailer,
    MailerResult, MissingDefaults, SmtpSettings, build_transport,
};

/// Builds transports and mailers for a variant from explicit dependencies.
///
/// Every call resolves the configuration afresh; nothing is cached between
/// calls, so concurrent callers never observe each other's options.
///
/// # Examples
///
/// ```rust
/// use dynamic_mailer::{DynamicMailer, MailerFactory, StaticDefaults, into_config_map};
/// use dynamic_mailer::lettre::transport::stub::StubTransport;
/// use serde_json::json;
///
/// struct Alerts;
/// impl DynamicMailer for Alerts {
///     fn prefix(&self) -> &str {
///         "alerts"
///     }
/// }
///
/// let defaults = StaticDefaults::new().with(
///     "alerts",
///     into_config_map(json!({
///         "host": "localhost",
///         "port": 25,
///         "from": {"address": "alerts@example.com", "name": "Alerts"}
///     }))?,
/// );
/// let factory = MailerFactory::new(Alerts, defaults);
/// let mailer = factory.mailer_with(StubTransport::new_ok(), &Default::default())?;
/// assert!(mailer.always(dynamic_mailer::AddressKind::From).is_some());
/// # Ok::<_, std::sync::Arc<dynamic_mailer::MailerError>>(())
/// ```
#[derive(Clone, Debug)]
pub struct MailerFactory<V, D> {
    variant: V,
    resolver: ConfigResolver<D>,
}

impl<V, D> MailerFactory<V, D>
where
    V: DynamicMailer,
    D: DefaultsSource,
{
    /// Create a factory for `variant` reading defaults from `defaults`.
    #[must_use]
    pub const fn new(variant: V, defaults: D) -> Self {
        Self {
            variant,
            resolver: ConfigResolver::new(defaults),
        }
    }

    /// Choose how a missing defaults prefix is handled.
    #[must_use]
    pub fn with_missing_defaults(self, policy: MissingDefaults) -> Self {
        Self {
            variant: self.variant,
            resolver: self.resolver.with_missing_defaults(policy),
        }
    }

    /// Borrow the variant.
    #[must_use]
    pub const fn variant(&self) -> &V {
        &self.variant
    }

    /// Borrow the resolver.
    #[must_use]
    pub const fn resolver(&self) -> &ConfigResolver<D> {
        &self.resolver
    }

    /// Resolve the merged options for `call_site`.
    ///
    /// # Errors
    ///
    /// Propagates defaults lookup and options hook failures.
    pub fn options(&self, call_site: &ConfigMap) -> MailerResult<ConfigMap> {
        self.resolver.resolve(&self.variant, call_site)
    }

    /// Resolve and interpret the SMTP settings for `call_site`.
    ///
    /// # Errors
    ///
    /// Propagates [`MailerFactory::options`] failures and reports missing or
    /// malformed transport keys.
    pub fn settings(&self, call_site: &ConfigMap) -> MailerResult<SmtpSettings> {
        SmtpSettings::from_config(&self.options(call_site)?)
    }

    /// Build an SMTP transport for `call_site`.
    ///
    /// # Errors
    ///
    /// Propagates [`MailerFactory::settings`] failures and TLS setup errors.
    pub fn transport(&self, call_site: &ConfigMap) -> MailerResult<SmtpTransport> {
        build_transport(&self.settings(call_site)?)
    }

    /// Build an SMTP-backed mailer for `call_site`.
    ///
    /// The options are resolved once and used for both the transport and the
    /// global addresses.
    ///
    /// # Errors
    ///
    /// Propagates resolution, transport and address failures.
    pub fn mailer(&self, call_site: &ConfigMap) -> MailerResult<Mailer<SmtpTransport>> {
        let options = self.options(call_site)?;
        let transport = build_transport(&SmtpSettings::from_config(&options)?)?;
        Mailer::new(transport, &GlobalAddresses::from_config(&options))
    }

    /// Build a mailer over a caller-supplied transport.
    ///
    /// Only the global addresses are taken from the resolved options, so the
    /// SMTP keys need not be present.
    ///
    /// # Errors
    ///
    /// Propagates resolution and address failures.
    pub fn mailer_with<T: Transport>(
        &self,
        transport: T,
        call_site: &ConfigMap,
    ) -> MailerResult<Mailer<T>> {
        let options = self.options(call_site)?;
        Mailer::new(transport, &GlobalAddresses::from_config(&options))
    }
}
