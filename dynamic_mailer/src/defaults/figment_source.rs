//! Figment-backed defaults loaded from files and environment variables.

use std::path::Path;

use figment::{Figment, providers::Env};
use serde_json::Value;

use crate::merge::value_kind;
use crate::{ConfigMap, MailerError, MailerResult, MailerResultExt};

use super::DefaultsSource;
use super::parser::{file_error, parse_defaults_by_format};

/// Key under which variant defaults are nested.
const DEFAULT_ROOT: &str = "dynamic";

/// Defaults read from a [`Figment`] under `dynamic.<prefix>`.
///
/// A mail configuration file groups the defaults of every variant:
///
/// ```toml
/// [dynamic.custom]
/// host = "smtp.example.com"
/// port = 587
/// auth_mode = "plain"
/// timeout = 2
///
/// [dynamic.custom.stream.ssl]
/// verify_peer = false
/// verify_peer_name = false
/// ```
///
/// Environment variables layered with [`FigmentDefaults::with_env`] use `__`
/// as the key separator, so `MAIL_DYNAMIC__CUSTOM__PORT=2525` overrides the
/// port above.
#[derive(Clone, Debug)]
pub struct FigmentDefaults {
    figment: Figment,
    root: String,
}

impl Default for FigmentDefaults {
    fn default() -> Self {
        Self::new(Figment::new())
    }
}

impl FigmentDefaults {
    /// Wrap an existing Figment.
    #[must_use]
    pub fn new(figment: Figment) -> Self {
        Self {
            figment,
            root: DEFAULT_ROOT.to_owned(),
        }
    }

    /// Load defaults from `path`, selecting the parser by extension.
    ///
    /// A missing file yields an empty source rather than an error, so a
    /// deployment may rely on environment variables alone.
    ///
    /// # Errors
    ///
    /// Returns [`MailerError::File`] when the file exists but cannot be read
    /// or parsed.
    pub fn from_file(path: &Path) -> MailerResult<Self> {
        if !path.is_file() {
            tracing::debug!(
                path = %path.display(),
                "defaults file not found; using empty defaults"
            );
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path).map_err(|e| file_error(path, e))?;
        let figment = parse_defaults_by_format(path, &data)?;
        tracing::debug!(path = %path.display(), "loaded dynamic mailer defaults");
        Ok(Self::new(figment))
    }

    /// Layer environment variables starting with `prefix` over the current
    /// providers. Nested keys are separated by `__`.
    #[must_use]
    pub fn with_env(self, prefix: &str) -> Self {
        Self {
            figment: self.figment.merge(Env::prefixed(prefix).split("__")),
            root: self.root,
        }
    }

    /// Nest variant defaults under `root` instead of `dynamic`.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    /// Borrow the underlying Figment.
    #[must_use]
    pub const fn figment(&self) -> &Figment {
        &self.figment
    }

    fn key_for(&self, prefix: &str) -> String {
        if self.root.is_empty() {
            prefix.to_owned()
        } else {
            format!("{}.{prefix}", self.root)
        }
    }
}

impl DefaultsSource for FigmentDefaults {
    fn lookup(&self, prefix: &str) -> MailerResult<Option<ConfigMap>> {
        let key = self.key_for(prefix);
        if !self.figment.contains(&key) {
            return Ok(None);
        }
        let value: Value = self.figment.extract_inner(&key).into_mailer()?;
        match value {
            Value::Object(map) => Ok(Some(map)),
            other => Err(MailerError::validation_arc(
                key,
                format!("defaults must be a mapping, found {}", value_kind(&other)),
            )),
        }
    }
}
