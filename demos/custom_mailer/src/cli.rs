//! Command-line surface of the `custom-mailer` demo.
//!
//! Global flags choose where the mail defaults come from; the `example`
//! subcommand supplies the call-site options and `bindings` lists the
//! resource names of the variant.
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use dynamic_mailer::lettre::message::Mailbox;
use dynamic_mailer::{ConfigMap, deep_merge};
use serde_json::Value;

use crate::custom::{DYNAMIC_FLAG, MAILER_ID};
use crate::error::OverrideError;

/// Username the example command passes at the call site.
pub const EXAMPLE_USERNAME: &str = "provided_in_user_code";

/// Command-line surface exposed by the demo.
#[derive(Debug, Parser)]
#[command(
    name = "custom-mailer",
    about = "Resolve and build the `custom` dynamic mailer",
    version
)]
pub struct CommandLine {
    /// Where the mail defaults are read from.
    #[command(flatten)]
    pub globals: GlobalArgs,
    /// Selected workflow to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct GlobalArgs {
    /// Mail configuration file holding `[dynamic.<prefix>]` tables.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        default_value = "mail.toml",
        global = true
    )]
    pub config: PathBuf,
    /// Prefix of environment variables layered over the file.
    #[arg(
        long = "env-prefix",
        value_name = "PREFIX",
        default_value = "MAIL_",
        global = true
    )]
    pub env_prefix: String,
}

/// Subcommands implemented by the demo.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Resolves the merged options, prints them and builds the mailer.
    #[command(name = "example")]
    Example(ExampleCommand),
    /// Prints the names the variant's resources would be bound under.
    #[command(name = "bindings")]
    Bindings,
}

/// Call-site options for the `example` command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct ExampleCommand {
    /// Extra call-site option; dotted keys nest and values parse as JSON
    /// when possible.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
    pub overrides: Vec<Override>,
    /// Look up stored credentials under this identifier.
    #[arg(long = "mailer-id", value_name = "ID")]
    pub mailer_id: Option<String>,
    /// Omit the flag that triggers the variant's dynamic behaviour.
    #[arg(long = "no-flag", action = ArgAction::SetTrue)]
    pub no_flag: bool,
    /// Send a test message to this address after building the mailer.
    #[arg(long = "send-to", value_name = "ADDRESS")]
    pub send_to: Option<Mailbox>,
}

impl ExampleCommand {
    /// Build the call-site options passed to the variant.
    ///
    /// Overrides are applied in order, so a later `--set` wins over an
    /// earlier one and over the built-in values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use custom_mailer::cli::ExampleCommand;
    /// use serde_json::json;
    ///
    /// let options = ExampleCommand::default().call_site_options();
    /// assert_eq!(options.get("username"), Some(&json!("provided_in_user_code")));
    /// assert_eq!(
    ///     options.get("flag_to_trigger_dynamic_behaviour"),
    ///     Some(&json!(true))
    /// );
    /// ```
    #[must_use]
    pub fn call_site_options(&self) -> ConfigMap {
        let mut options = ConfigMap::new();
        options.insert("username".into(), Value::from(EXAMPLE_USERNAME));
        if !self.no_flag {
            options.insert(DYNAMIC_FLAG.into(), Value::Bool(true));
        }
        if let Some(id) = &self.mailer_id {
            options.insert(MAILER_ID.into(), Value::from(id.as_str()));
        }
        self.overrides
            .iter()
            .fold(options, |acc, entry| deep_merge(&acc, &entry.to_map()))
    }
}

/// A single `--set KEY=VALUE` call-site option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    path: Vec<String>,
    value: Value,
}

impl Override {
    /// Dotted key segments.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Parsed value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Nest the value under its key segments.
    #[must_use]
    pub fn to_map(&self) -> ConfigMap {
        let nested = self
            .path
            .iter()
            .skip(1)
            .rev()
            .fold(self.value.clone(), |inner, key| {
                let mut map = ConfigMap::new();
                map.insert(key.clone(), inner);
                Value::Object(map)
            });
        let mut root = ConfigMap::new();
        if let Some(first) = self.path.first() {
            root.insert(first.clone(), nested);
        }
        root
    }
}

/// Parse a `KEY=VALUE` argument.
///
/// Values that parse as JSON keep their type (`2525`, `true`, `{"a": 1}`);
/// anything else is taken as a string.
///
/// # Errors
///
/// Returns an [`OverrideError`] when the separator is missing or the key has
/// an empty segment.
///
/// # Examples
///
/// ```rust
/// use custom_mailer::cli::parse_override;
/// use serde_json::json;
///
/// let entry = parse_override("stream.ssl.verify_peer=false")?;
/// assert_eq!(entry.path(), ["stream", "ssl", "verify_peer"]);
/// assert_eq!(entry.value(), &json!(false));
/// # Ok::<_, custom_mailer::error::OverrideError>(())
/// ```
pub fn parse_override(raw: &str) -> Result<Override, OverrideError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| OverrideError::MissingSeparator(raw.to_owned()))?;
    let path: Vec<String> = key.trim().split('.').map(str::to_owned).collect();
    if path.iter().any(String::is_empty) {
        return Err(OverrideError::EmptyKey(key.to_owned()));
    }
    let parsed =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));
    Ok(Override {
        path,
        value: parsed,
    })
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use rstest::rstest;
    use serde_json::json;
    use test_helpers::config::map;

    use super::*;

    fn parsed(raw: &str) -> Override {
        parse_override(raw).unwrap_or_else(|err| panic!("override {raw}: {err}"))
    }

    #[rstest]
    fn command_definition_is_consistent() {
        CommandLine::command().debug_assert();
    }

    #[rstest]
    #[case::number("port=2525", json!({"port": 2525}))]
    #[case::string("host=smtp.example.com", json!({"host": "smtp.example.com"}))]
    #[case::empty_value("secure=", json!({"secure": ""}))]
    #[case::nested("stream.ssl.verify_peer=false", json!({"stream": {"ssl": {"verify_peer": false}}}))]
    #[case::json_object("from={\"address\":\"a@example.com\"}", json!({"from": {"address": "a@example.com"}}))]
    fn overrides_nest_and_keep_types(#[case] raw: &str, #[case] expected: Value) {
        assert_eq!(parsed(raw).to_map(), map(expected));
    }

    #[rstest]
    #[case::no_separator("port", OverrideError::MissingSeparator("port".into()))]
    #[case::empty_key("=1", OverrideError::EmptyKey(String::new()))]
    #[case::empty_segment("stream..ssl=1", OverrideError::EmptyKey("stream..ssl".into()))]
    fn malformed_overrides_are_rejected(#[case] raw: &str, #[case] expected: OverrideError) {
        assert_eq!(parse_override(raw), Err(expected));
    }

    #[rstest]
    fn example_defaults_match_user_code() {
        let options = ExampleCommand::default().call_site_options();
        assert_eq!(
            options,
            map(json!({
                "username": EXAMPLE_USERNAME,
                DYNAMIC_FLAG: true
            }))
        );
    }

    #[rstest]
    fn later_overrides_win() {
        let command = ExampleCommand {
            overrides: vec![parsed("username=first"), parsed("username=second")],
            mailer_id: Some("billing".into()),
            no_flag: true,
            send_to: None,
        };
        assert_eq!(
            command.call_site_options(),
            map(json!({"username": "second", "mailer_id": "billing"}))
        );
    }

    #[rstest]
    fn parses_example_arguments() {
        let cli = CommandLine::try_parse_from([
            "custom-mailer",
            "--config",
            "alt.toml",
            "example",
            "--set",
            "port=2525",
            "--no-flag",
        ])
        .unwrap_or_else(|err| panic!("parse failed: {err}"));
        assert_eq!(cli.globals.config, PathBuf::from("alt.toml"));
        assert_eq!(cli.globals.env_prefix, "MAIL_");
        let Commands::Example(command) = cli.command else {
            panic!("expected the example command");
        };
        assert!(command.no_flag);
        assert_eq!(command.overrides, vec![parsed("port=2525")]);
    }

    #[rstest]
    fn rejects_invalid_recipient() {
        let result = CommandLine::try_parse_from([
            "custom-mailer",
            "example",
            "--send-to",
            "not an address",
        ]);
        assert!(result.is_err());
    }
}
