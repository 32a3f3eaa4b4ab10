//! Helpers for running defaults lookups inside `figment::Jail`.
//!
//! A jail gives each test a scratch working directory and restores the
//! process environment afterwards, so defaults files and `MAIL_*` overrides
//! never leak between tests.

use anyhow::{Result, anyhow};

/// Name of the defaults file written by [`with_mail_config`].
pub const MAIL_CONFIG: &str = "mail.toml";

/// Executes `f` inside a [`figment::Jail`], returning the closure's output.
///
/// Jail failures and closure errors are both reported as `anyhow::Error`.
///
/// # Errors
///
/// Returns an error if the jail cannot be set up or the closure returns a
/// [`figment::error::Error`].
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|j| {
        output = Some(f(j)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}

/// Writes `body` to [`MAIL_CONFIG`], sets each `(key, value)` pair in the
/// environment and then runs `f` with the file's name.
///
/// # Errors
///
/// Returns an error if the file cannot be written or `f` fails.
pub fn with_mail_config<F, T>(body: &str, env: &[(&str, &str)], f: F) -> Result<T>
where
    F: FnOnce(&str) -> figment::error::Result<T>,
{
    with_jail(|j| {
        j.create_file(MAIL_CONFIG, body)?;
        for (key, value) in env {
            j.set_env(key, value);
        }
        f(MAIL_CONFIG)
    })
}

/// Converts any displayable error into a [`figment::Error`].
///
/// Lets jail closures use `?` on the crate's own results.
#[expect(
    clippy::needless_pass_by_value,
    reason = "used as a `map_err` adapter, which hands over the error by value"
)]
pub fn figment_error<E: ToString>(err: E) -> figment::Error {
    figment::Error::from(err.to_string())
}
