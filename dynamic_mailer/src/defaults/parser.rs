//! Format-specific parsing of defaults files.

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use figment::{
    Figment,
    providers::{Format, Json, Toml},
};

use crate::{MailerError, MailerResult};

/// Construct a [`MailerError::File`] for a defaults path.
pub(super) fn file_error(
    path: &Path,
    err: impl Into<Box<dyn Error + Send + Sync>>,
) -> Arc<MailerError> {
    Arc::new(MailerError::File {
        path: path.to_path_buf(),
        source: err.into(),
    })
}

/// Parse defaults data according to the file extension.
///
/// `.json` files are parsed as JSON; every other extension is treated as
/// TOML.
///
/// # Errors
///
/// Returns a [`MailerError::File`] when the contents fail to parse.
pub(super) fn parse_defaults_by_format(path: &Path, data: &str) -> MailerResult<Figment> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let figment = if ext.as_deref() == Some("json") {
        serde_json::from_str::<serde_json::Value>(data).map_err(|e| file_error(path, e))?;
        Figment::from(Json::string(data))
    } else {
        // Validate first so parse failures carry this file's path.
        toml::from_str::<toml::Value>(data).map_err(|e| file_error(path, e))?;
        Figment::from(Toml::string(data))
    };
    Ok(figment)
}
