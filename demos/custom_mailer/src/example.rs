//! The `example` and `bindings` workflows.
//!
//! Output is written to any [`Write`] so tests can capture it; `main` passes
//! a locked standard output.
use std::io::{self, Write};

use dynamic_mailer::{
    ConfigMap, DefaultsSource, DynamicMailer, FigmentDefaults, GlobalAddresses, Mailer,
    MailerFactory, MailerResultExt, SmtpSettings, build_transport,
};
use serde_json::Value;

use crate::cli::{ExampleCommand, GlobalArgs};
use crate::credentials::FigmentCredentials;
use crate::custom::CustomMailer;
use crate::error::Result;

/// Keys whose values never reach the output.
const REDACTED_KEYS: [&str; 1] = ["password"];
const REDACTED: &str = "***";

/// Factory for the `custom` variant over file and environment defaults.
pub type CustomFactory = MailerFactory<CustomMailer<FigmentCredentials>, FigmentDefaults>;

/// Load the defaults and credentials named by `globals`.
///
/// # Errors
///
/// Returns an error when the configuration file exists but cannot be parsed.
pub fn load_factory(globals: &GlobalArgs) -> Result<CustomFactory> {
    let defaults = FigmentDefaults::from_file(&globals.config)?.with_env(&globals.env_prefix);
    let store = FigmentCredentials::new(defaults.figment().clone());
    Ok(MailerFactory::new(CustomMailer::new(store), defaults))
}

/// Replace secret values with a placeholder at every depth.
///
/// # Examples
///
/// ```rust
/// use custom_mailer::example::redact;
/// use serde_json::{Map, json};
///
/// let mut options = Map::new();
/// options.insert("user".into(), json!("bill"));
/// options.insert("password".into(), json!("hunter2"));
/// let shown = redact(&options);
/// assert_eq!(shown.get("user"), Some(&json!("bill")));
/// assert_eq!(shown.get("password"), Some(&json!("***")));
/// ```
#[must_use]
pub fn redact(options: &ConfigMap) -> ConfigMap {
    options
        .iter()
        .map(|(key, value)| {
            let shown = if REDACTED_KEYS.contains(&key.as_str()) {
                Value::from(REDACTED)
            } else if let Value::Object(nested) = value {
                Value::Object(redact(nested))
            } else {
                value.clone()
            };
            (key.clone(), shown)
        })
        .collect()
}

/// Writes the merged options as pretty JSON followed by a newline.
///
/// # Errors
///
/// Returns an [`io::Error`] when writing fails.
pub fn write_options_to<W: Write>(out: &mut W, options: &ConfigMap) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, &redact(options))?;
    writeln!(out)
}

/// Writes the one-line transport summary.
///
/// # Errors
///
/// Returns an [`io::Error`] when writing fails.
pub fn write_summary_to<W: Write>(out: &mut W, settings: &SmtpSettings) -> io::Result<()> {
    let encryption = settings
        .secure
        .map_or_else(|| "none".to_owned(), |mode| mode.to_string());
    let auth = if settings.credentials().is_some() {
        "with credentials"
    } else {
        "anonymous"
    };
    writeln!(
        out,
        "mailer ready: {}:{} (encryption: {encryption}, {auth})",
        settings.host, settings.port
    )
}

/// Resolve, print and build the mailer.
///
/// The options are resolved once; the printed mapping is the one the
/// transport and global addresses are built from. Sends a test message only
/// when `--send-to` was given.
///
/// # Errors
///
/// Returns an error when resolution, transport construction, delivery or
/// writing the output fails.
pub fn run_example<W, V, D>(
    out: &mut W,
    factory: &MailerFactory<V, D>,
    command: &ExampleCommand,
) -> Result<()>
where
    W: Write,
    V: DynamicMailer,
    D: DefaultsSource,
{
    let call_site = command.call_site_options();
    let options = factory.options(&call_site)?;
    write_options_to(out, &options)?;

    let settings = SmtpSettings::from_config(&options)?;
    let mailer = Mailer::new(
        build_transport(&settings)?,
        &GlobalAddresses::from_config(&options),
    )?;
    write_summary_to(out, &settings)?;

    if let Some(recipient) = &command.send_to {
        let message = mailer
            .message()
            .to(recipient.clone())
            .subject("dynamic mailer test")
            .body(String::from("Sent by the custom dynamic mailer example."))
            .into_mailer()?;
        mailer.send(&message)?;
        tracing::info!(recipient = %recipient, "test message sent");
        writeln!(out, "sent test message to {recipient}")?;
    }
    Ok(())
}

/// Writes the binding names of the `custom` variant, one per line.
///
/// # Errors
///
/// Returns an [`io::Error`] when writing fails.
pub fn write_bindings_to<W: Write, V: DynamicMailer>(out: &mut W, variant: &V) -> io::Result<()> {
    for name in variant.bindings().names() {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::{Result, anyhow, ensure};
    use dynamic_mailer::StaticDefaults;
    use rstest::rstest;
    use serde_json::json;
    use test_helpers::config::map;

    use super::*;
    use crate::cli::parse_override;
    use crate::credentials::{CredentialStore, MemoryCredentials, StoredCredentials};
    use crate::error::CredentialError;

    fn output(bytes: Vec<u8>) -> Result<String> {
        String::from_utf8(bytes).map_err(|err| anyhow!(err))
    }

    #[rstest]
    fn redacts_nested_passwords() {
        let options = map(json!({
            "password": "top",
            "relay": {"password": "inner", "host": "relay.example.com"}
        }));
        assert_eq!(
            redact(&options),
            map(json!({
                "password": "***",
                "relay": {"password": "***", "host": "relay.example.com"}
            }))
        );
    }

    #[rstest]
    fn writes_pretty_json() -> Result<()> {
        let mut buffer = Vec::new();
        write_options_to(&mut buffer, &map(json!({"port": 25, "password": "pw"})))?;
        let text = output(buffer)?;
        ensure!(text == "{\n  \"password\": \"***\",\n  \"port\": 25\n}\n");
        Ok(())
    }

    #[rstest]
    #[case::plain(json!({"host": "localhost", "port": 25}), "mailer ready: localhost:25 (encryption: none, anonymous)\n")]
    #[case::secure(
        json!({"host": "smtp.example.com", "port": 465, "secure": "ssl", "user": "u", "password": "p"}),
        "mailer ready: smtp.example.com:465 (encryption: ssl, with credentials)\n"
    )]
    fn summarises_transport(#[case] config: Value, #[case] expected: &str) -> Result<()> {
        let settings = SmtpSettings::from_config(&map(config)).map_err(|err| anyhow!(err))?;
        let mut buffer = Vec::new();
        write_summary_to(&mut buffer, &settings)?;
        ensure!(output(buffer)? == expected);
        Ok(())
    }

    #[rstest]
    fn lists_bindings() -> Result<()> {
        let mut buffer = Vec::new();
        write_bindings_to(&mut buffer, &CustomMailer::new(MemoryCredentials::default()))?;
        ensure!(
            output(buffer)?
                == "custom.dynamic.mailer\ncustom.dynamic.swift.mailer\ncustom.dynamic.swift.transport\n"
        );
        Ok(())
    }

    #[rstest]
    fn example_prints_merged_options() -> Result<()> {
        let defaults = FigmentDefaults::new(figment::Figment::from(
            figment::providers::Serialized::defaults(json!({
                "dynamic": {"custom": {"host": "localhost", "port": 2525, "password": "pw"}}
            })),
        ));
        let store = FigmentCredentials::new(defaults.figment().clone());
        let factory = MailerFactory::new(CustomMailer::new(store), defaults);
        let command = ExampleCommand {
            overrides: vec![parse_override("timeout=5").map_err(|err| anyhow!(err))?],
            ..ExampleCommand::default()
        };

        let mut buffer = Vec::new();
        run_example(&mut buffer, &factory, &command).map_err(|err| anyhow!(err.to_string()))?;
        let text = output(buffer)?;
        let (json_part, summary) = text
            .rsplit_once("}\n")
            .ok_or_else(|| anyhow!("missing JSON output: {text}"))?;
        let printed: Value = serde_json::from_str(&format!("{json_part}}}"))?;
        ensure!(
            printed
                == json!({
                    "host": "localhost",
                    "port": 2525,
                    "password": "***",
                    "username": "provided_in_user_code",
                    "tls": false,
                    "timeout": 5
                }),
            "unexpected options: {printed}"
        );
        ensure!(summary == "mailer ready: localhost:2525 (encryption: none, anonymous)\n");
        Ok(())
    }

    #[rstest]
    fn example_without_host_fails_late() {
        let factory = MailerFactory::new(
            CustomMailer::new(FigmentCredentials::new(figment::Figment::new())),
            FigmentDefaults::default(),
        );
        let mut buffer = Vec::new();
        let result = run_example(&mut buffer, &factory, &ExampleCommand::default());
        assert!(result.is_err());
        assert!(!buffer.is_empty(), "options are printed before validation");
    }

    struct CountingStore {
        calls: AtomicUsize,
    }

    impl CredentialStore for CountingStore {
        fn credentials(
            &self,
            _mailer_id: &str,
        ) -> std::result::Result<Option<StoredCredentials>, CredentialError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(StoredCredentials::new("bill", "pw")))
        }
    }

    #[rstest]
    fn example_resolves_options_once() -> Result<()> {
        let store = CountingStore {
            calls: AtomicUsize::new(0),
        };
        let factory = MailerFactory::new(
            CustomMailer::new(&store),
            StaticDefaults::new().with("custom", map(json!({"host": "localhost", "port": 25}))),
        );
        let command = ExampleCommand {
            mailer_id: Some("billing".into()),
            no_flag: true,
            ..ExampleCommand::default()
        };

        let mut buffer = Vec::new();
        run_example(&mut buffer, &factory, &command).map_err(|err| anyhow!(err.to_string()))?;
        ensure!(store.calls.load(Ordering::SeqCst) == 1);
        ensure!(output(buffer)?.ends_with("(encryption: none, with credentials)\n"));
        Ok(())
    }

    #[rstest]
    fn static_defaults_work_with_the_variant() -> Result<()> {
        let factory = MailerFactory::new(
            CustomMailer::new(MemoryCredentials::default()),
            StaticDefaults::new().with("custom", map(json!({"host": "localhost", "port": 25}))),
        );
        let options = factory
            .options(&ExampleCommand::default().call_site_options())
            .map_err(|err| anyhow!(err))?;
        ensure!(options.get("tls") == Some(&json!(false)));
        Ok(())
    }
}
