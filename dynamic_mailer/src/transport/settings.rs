//! Typed view of the merged SMTP configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use serde_json::Value;

use crate::merge::value_kind;
use crate::{ConfigMap, MailerError, MailerResult};

/// Encryption requested through the `secure` key.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Encryption {
    /// Upgrade a plain connection with `STARTTLS`; the upgrade is mandatory.
    Tls,
    /// Open the connection inside TLS from the first byte.
    Ssl,
}

impl FromStr for Encryption {
    type Err = MailerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tls" => Ok(Self::Tls),
            "ssl" => Ok(Self::Ssl),
            other => Err(MailerError::validation(
                "secure",
                format!("unsupported encryption '{other}', expected 'tls' or 'ssl'"),
            )),
        }
    }
}

impl fmt::Display for Encryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tls => "tls",
            Self::Ssl => "ssl",
        })
    }
}

/// Authentication mechanism requested through the `auth_mode` key.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AuthMode {
    /// `PLAIN` (RFC 4616).
    Plain,
    /// `LOGIN`.
    Login,
    /// `XOAUTH2` bearer tokens.
    Xoauth2,
}

impl AuthMode {
    /// The matching `lettre` mechanism.
    #[must_use]
    pub const fn mechanism(self) -> Mechanism {
        match self {
            Self::Plain => Mechanism::Plain,
            Self::Login => Mechanism::Login,
            Self::Xoauth2 => Mechanism::Xoauth2,
        }
    }
}

impl FromStr for AuthMode {
    type Err = MailerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "login" => Ok(Self::Login),
            "xoauth2" => Ok(Self::Xoauth2),
            other => Err(MailerError::validation(
                "auth_mode",
                format!("unsupported authentication mode '{other}'"),
            )),
        }
    }
}

/// TLS verification switches taken from `stream.ssl`.
///
/// Unknown entries are kept in [`StreamOptions::raw`] so diagnostics can show
/// the full stream configuration that was supplied.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamOptions {
    /// Verify the server certificate chain (`stream.ssl.verify_peer`).
    pub verify_peer: bool,
    /// Verify that the certificate matches the host (`stream.ssl.verify_peer_name`).
    pub verify_peer_name: bool,
    /// The `stream` mapping as supplied.
    pub raw: ConfigMap,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            verify_peer: true,
            verify_peer_name: true,
            raw: ConfigMap::new(),
        }
    }
}

impl StreamOptions {
    /// Parse the `stream` value of a merged configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MailerError::Validation`] when `stream` or `stream.ssl` is not
    /// a mapping, or when a verification switch is not a boolean.
    pub fn from_value(value: &Value) -> MailerResult<Self> {
        let Value::Object(raw) = value else {
            return Err(MailerError::validation_arc(
                "stream",
                format!("expected a mapping, found {}", value_kind(value)),
            ));
        };
        let ssl = match raw.get("ssl") {
            None | Some(Value::Null) => None,
            Some(Value::Object(ssl)) => Some(ssl),
            Some(other) => {
                return Err(MailerError::validation_arc(
                    "stream.ssl",
                    format!("expected a mapping, found {}", value_kind(other)),
                ));
            }
        };
        let flag = |name: &str| -> MailerResult<bool> {
            match ssl.and_then(|map| map.get(name)) {
                None | Some(Value::Null) => Ok(true),
                Some(Value::Bool(flag)) => Ok(*flag),
                Some(other) => Err(MailerError::validation_arc(
                    format!("stream.ssl.{name}"),
                    format!("expected a boolean, found {}", value_kind(other)),
                )),
            }
        };
        Ok(Self {
            verify_peer: flag("verify_peer")?,
            verify_peer_name: flag("verify_peer_name")?,
            raw: raw.clone(),
        })
    }
}

/// SMTP connection parameters extracted from a merged configuration.
#[derive(Clone, PartialEq)]
pub struct SmtpSettings {
    /// Server host name.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Login name, used only together with `password`.
    pub user: Option<String>,
    /// Password, used only together with `user`.
    pub password: Option<String>,
    /// Requested encryption.
    pub secure: Option<Encryption>,
    /// Requested authentication mechanism.
    pub auth_mode: Option<AuthMode>,
    /// Connection timeout in seconds.
    pub timeout: Option<u64>,
    /// TLS stream options.
    pub stream: Option<StreamOptions>,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("secure", &self.secure)
            .field("auth_mode", &self.auth_mode)
            .field("timeout", &self.timeout)
            .field("stream", &self.stream)
            .finish()
    }
}

impl SmtpSettings {
    /// Interpret a merged configuration.
    ///
    /// `host` and `port` are required. An empty `secure` string or `false`
    /// counts as absent. Numeric or boolean `host`, `user` and `password`
    /// values are taken as their text form. Keys the transport does not
    /// understand are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`MailerError::Validation`] naming the first missing or
    /// malformed key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dynamic_mailer::{Encryption, SmtpSettings, into_config_map};
    /// use serde_json::json;
    ///
    /// let config = into_config_map(json!({
    ///     "host": "smtp.example.com",
    ///     "port": 465,
    ///     "secure": "ssl",
    ///     "timeout": 2
    /// }))?;
    /// let settings = SmtpSettings::from_config(&config)?;
    /// assert_eq!(settings.secure, Some(Encryption::Ssl));
    /// assert_eq!(settings.timeout, Some(2));
    /// # Ok::<_, std::sync::Arc<dynamic_mailer::MailerError>>(())
    /// ```
    pub fn from_config(config: &ConfigMap) -> MailerResult<Self> {
        let host = required_scalar(config, "host")?;
        let port = required_port(config)?;
        let secure = match config.get("secure") {
            Some(Value::Bool(false)) => None,
            _ => match optional_string(config, "secure")? {
                Some(mode) if !mode.is_empty() => Some(mode.parse::<Encryption>()?),
                _ => None,
            },
        };
        let auth_mode = optional_string(config, "auth_mode")?
            .map(|mode| mode.parse::<AuthMode>())
            .transpose()?;
        let stream = match config.get("stream") {
            None | Some(Value::Null) => None,
            Some(value) => Some(StreamOptions::from_value(value)?),
        };
        Ok(Self {
            host,
            port,
            user: optional_scalar(config, "user")?,
            password: optional_scalar(config, "password")?,
            secure,
            auth_mode,
            timeout: optional_integer(config, "timeout")?,
            stream,
        })
    }

    /// Credentials, present only when both `user` and `password` are set.
    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.user, &self.password) {
            (Some(user), Some(password)) => Some(Credentials::new(user.clone(), password.clone())),
            _ => None,
        }
    }

    /// The connection timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

fn required_scalar(config: &ConfigMap, key: &str) -> MailerResult<String> {
    optional_scalar(config, key)?
        .ok_or_else(|| MailerError::validation_arc(key, "required value is missing"))
}

/// Read a string; numbers and booleans are rendered in their text form.
fn optional_scalar(config: &ConfigMap, key: &str) -> MailerResult<Option<String>> {
    match config.get(key) {
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
        _ => optional_string(config, key),
    }
}

fn optional_string(config: &ConfigMap, key: &str) -> MailerResult<Option<String>> {
    match config.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(other) => Err(MailerError::validation_arc(
            key,
            format!("expected a string, found {}", value_kind(other)),
        )),
    }
}

fn optional_integer(config: &ConfigMap, key: &str) -> MailerResult<Option<u64>> {
    match config.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number.as_u64().map(Some).ok_or_else(|| {
            MailerError::validation_arc(key, "expected a non-negative integer")
        }),
        Some(Value::String(text)) => text.trim().parse::<u64>().map(Some).map_err(|_| {
            MailerError::validation_arc(key, format!("'{text}' is not a non-negative integer"))
        }),
        Some(other) => Err(MailerError::validation_arc(
            key,
            format!("expected an integer, found {}", value_kind(other)),
        )),
    }
}

fn required_port(config: &ConfigMap) -> MailerResult<u16> {
    let port = optional_integer(config, "port")?
        .ok_or_else(|| MailerError::validation_arc("port", "required value is missing"))?;
    u16::try_from(port)
        .map_err(|_| MailerError::validation_arc("port", format!("{port} is out of range")))
}
