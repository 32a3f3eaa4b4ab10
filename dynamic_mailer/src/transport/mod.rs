//! SMTP transport construction from merged configuration.
//!
//! [`build_transport`] applies the conceptual setter calls in order: host and
//! port always, then encryption, credentials, authentication mechanism and
//! timeout when their keys are present. Building never opens a connection.

mod settings;

pub use settings::{AuthMode, Encryption, SmtpSettings, StreamOptions};

use lettre::SmtpTransport;
use lettre::transport::smtp::client::{Tls, TlsParameters};

use crate::{MailerResult, MailerResultExt};

/// Build an SMTP transport from `settings`.
///
/// # Errors
///
/// Returns [`crate::MailerError::Transport`] when TLS parameters cannot be
/// constructed for the configured host.
///
/// # Examples
///
/// ```rust
/// use dynamic_mailer::{SmtpSettings, build_transport, into_config_map};
/// use serde_json::json;
///
/// let config = into_config_map(json!({
///     "host": "localhost",
///     "port": 2525,
///     "user": "mailer",
///     "password": "secret",
///     "auth_mode": "login"
/// }))?;
/// let transport = build_transport(&SmtpSettings::from_config(&config)?)?;
/// # drop(transport);
/// # Ok::<_, std::sync::Arc<dynamic_mailer::MailerError>>(())
/// ```
pub fn build_transport(settings: &SmtpSettings) -> MailerResult<SmtpTransport> {
    let mut builder = SmtpTransport::builder_dangerous(settings.host.as_str()).port(settings.port);

    if let Some(encryption) = settings.secure {
        let parameters = tls_parameters(settings)?;
        builder = builder.tls(match encryption {
            Encryption::Tls => Tls::Required(parameters),
            Encryption::Ssl => Tls::Wrapper(parameters),
        });
    }
    if let Some(credentials) = settings.credentials() {
        builder = builder.credentials(credentials);
    }
    if let Some(mode) = settings.auth_mode {
        builder = builder.authentication(vec![mode.mechanism()]);
    }
    if let Some(timeout) = settings.timeout() {
        builder = builder.timeout(Some(timeout));
    }

    tracing::debug!(
        host = %settings.host,
        port = settings.port,
        secure = ?settings.secure,
        authenticated = settings.credentials().is_some(),
        "built SMTP transport"
    );
    Ok(builder.build())
}

fn tls_parameters(settings: &SmtpSettings) -> MailerResult<TlsParameters> {
    let stream = settings.stream.clone().unwrap_or_default();
    TlsParameters::builder(settings.host.clone())
        .dangerous_accept_invalid_certs(!stream.verify_peer)
        .dangerous_accept_invalid_hostnames(!stream.verify_peer_name)
        .build()
        .into_mailer()
}
