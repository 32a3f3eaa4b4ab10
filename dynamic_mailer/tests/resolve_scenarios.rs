//! Integration tests covering three-layer resolution end to end.
//!
//! Each scenario builds a variant, a defaults table and call-site options,
//! then checks the merged mapping and what the factory builds from it.

use std::sync::Arc;
use std::thread;

use anyhow::{Result, anyhow, ensure};
use dynamic_mailer::lettre::transport::stub::StubTransport;
use dynamic_mailer::{
    AddressKind, ConfigMap, DynamicMailer, MailerError, MailerFactory, MailerResult,
    MissingDefaults, StaticDefaults, deep_merge,
};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use test_helpers::config::map;

/// Variant that consumes a flag and disables TLS when it is present.
struct FlaggedMailer;

impl DynamicMailer for FlaggedMailer {
    fn prefix(&self) -> &str {
        "custom"
    }

    fn subclass_options(&self, call_site: &ConfigMap) -> MailerResult<ConfigMap> {
        let mut options = call_site.clone();
        if options.remove("flag_to_trigger_dynamic_behaviour").is_some() {
            options.insert("tls".into(), json!(false));
            return Ok(options);
        }
        Ok(ConfigMap::new())
    }
}

/// Variant relying on the provided passthrough hook.
struct PlainMailer;

impl DynamicMailer for PlainMailer {
    fn prefix(&self) -> &str {
        "custom"
    }
}

/// Variant whose lookup always fails.
struct BrokenLookup;

impl DynamicMailer for BrokenLookup {
    fn prefix(&self) -> &str {
        "custom"
    }

    fn subclass_options(&self, _call_site: &ConfigMap) -> MailerResult<ConfigMap> {
        Err(Arc::new(MailerError::hook(
            self.prefix(),
            std::io::Error::other("credential store offline"),
        )))
    }
}

#[fixture]
fn defaults() -> StaticDefaults {
    StaticDefaults::new().with(
        "custom",
        map(json!({
            "host": "smtp.example.com",
            "port": 587,
            "stream": {"ssl": {"verify_peer": false}}
        })),
    )
}

#[rstest]
fn hook_consumes_flag_and_adds_options(defaults: StaticDefaults) -> Result<()> {
    let factory = MailerFactory::new(FlaggedMailer, defaults);
    let call_site = map(json!({
        "flag_to_trigger_dynamic_behaviour": true,
        "username": "provided_in_user_code"
    }));

    let resolved = factory.options(&call_site)?;
    ensure!(
        resolved
            == map(json!({
                "host": "smtp.example.com",
                "port": 587,
                "stream": {"ssl": {"verify_peer": false}},
                "username": "provided_in_user_code",
                "tls": false
            })),
        "unexpected resolution: {resolved:?}"
    );
    ensure!(!resolved.contains_key("flag_to_trigger_dynamic_behaviour"));
    Ok(())
}

#[rstest]
fn hook_may_contribute_nothing(defaults: StaticDefaults) -> Result<()> {
    let factory = MailerFactory::new(FlaggedMailer, defaults.clone());
    let resolved = factory.options(&map(json!({"port": 2525})))?;
    let expected = dynamic_mailer::DefaultsSource::lookup(&defaults, "custom")?
        .ok_or_else(|| anyhow!("defaults missing"))?;
    ensure!(resolved == expected, "call-site port must not leak past the hook");
    Ok(())
}

#[rstest]
fn without_hook_call_site_overlays_defaults() -> Result<()> {
    let defaults = StaticDefaults::new().with("custom", map(json!({"host": "a", "port": 25})));
    let factory = MailerFactory::new(PlainMailer, defaults);
    let call_site = map(json!({"port": 2525}));
    let resolved = factory.options(&call_site)?;
    ensure!(resolved == map(json!({"host": "a", "port": 2525})));
    Ok(())
}

#[rstest]
fn nested_stream_options_merge_recursively() -> Result<()> {
    let defaults = StaticDefaults::new().with(
        "custom",
        map(json!({"stream": {"ssl": {"verify_peer": false, "verify_peer_name": false}}})),
    );
    let factory = MailerFactory::new(PlainMailer, defaults);
    let resolved = factory.options(&map(json!({"stream": {"ssl": {"verify_peer": true}}})))?;
    ensure!(
        resolved.get("stream")
            == Some(&json!({"ssl": {"verify_peer": true, "verify_peer_name": false}}))
    );
    Ok(())
}

#[rstest]
#[case::no_options(json!({}))]
#[case::flat(json!({"port": 2525, "user": "u"}))]
#[case::nested(json!({"stream": {"ssl": {"verify_peer_name": true}}, "secure": "tls"}))]
fn passthrough_resolution_equals_deep_merge(
    defaults: StaticDefaults,
    #[case] call_site: Value,
) -> Result<()> {
    let call_site = map(call_site);
    let base = dynamic_mailer::DefaultsSource::lookup(&defaults, "custom")?
        .ok_or_else(|| anyhow!("defaults missing"))?;
    let factory = MailerFactory::new(PlainMailer, defaults);
    ensure!(factory.options(&call_site)? == deep_merge(&base, &call_site));
    Ok(())
}

#[rstest]
fn resolution_leaves_inputs_untouched(defaults: StaticDefaults) -> Result<()> {
    let defaults_snapshot = defaults.clone();
    let call_site = map(json!({
        "flag_to_trigger_dynamic_behaviour": true,
        "stream": {"ssl": {"verify_peer": true}}
    }));
    let call_site_snapshot = call_site.clone();

    let factory = MailerFactory::new(FlaggedMailer, &defaults);
    let _resolved = factory.options(&call_site)?;

    ensure!(call_site == call_site_snapshot);
    ensure!(defaults == defaults_snapshot);
    Ok(())
}

#[rstest]
#[case::empty_policy(MissingDefaults::Empty, true)]
#[case::error_policy(MissingDefaults::Error, false)]
fn missing_prefix_follows_policy(#[case] policy: MissingDefaults, #[case] succeeds: bool) {
    let factory =
        MailerFactory::new(PlainMailer, StaticDefaults::new()).with_missing_defaults(policy);
    let outcome = factory.options(&map(json!({"host": "h"})));
    match outcome {
        Ok(resolved) => {
            assert!(succeeds, "expected ConfigNotFound");
            assert_eq!(resolved, map(json!({"host": "h"})));
        }
        Err(err) => {
            assert!(!succeeds, "unexpected error: {err}");
            assert!(matches!(&*err, MailerError::ConfigNotFound { prefix } if prefix == "custom"));
        }
    }
}

#[rstest]
fn hook_errors_propagate_unchanged(defaults: StaticDefaults) -> Result<()> {
    let factory = MailerFactory::new(BrokenLookup, defaults);
    let err = factory
        .options(&ConfigMap::new())
        .err()
        .ok_or_else(|| anyhow!("expected hook failure"))?;
    ensure!(matches!(&*err, MailerError::Hook { prefix, .. } if prefix == "custom"));
    ensure!(err.to_string().contains("credential store offline"));
    Ok(())
}

#[rstest]
fn missing_host_fails_only_when_transport_is_built() -> Result<()> {
    let factory = MailerFactory::new(PlainMailer, StaticDefaults::new());
    let call_site = map(json!({"port": 25}));
    ensure!(factory.options(&call_site).is_ok(), "resolution must not validate");
    let err = factory
        .transport(&call_site)
        .err()
        .ok_or_else(|| anyhow!("expected validation failure"))?;
    ensure!(matches!(&*err, MailerError::Validation { key, .. } if key == "host"));
    Ok(())
}

#[rstest]
fn global_addresses_register_only_mappings() -> Result<()> {
    let defaults = StaticDefaults::new().with(
        "custom",
        map(json!({
            "host": "localhost",
            "port": 25,
            "from": {"address": "a@b.com", "name": "A"},
            "reply_to": "support@b.com"
        })),
    );
    let factory = MailerFactory::new(PlainMailer, defaults);
    let mailer = factory.mailer_with(StubTransport::new_ok(), &ConfigMap::new())?;

    let from = mailer
        .always(AddressKind::From)
        .ok_or_else(|| anyhow!("from address missing"))?;
    ensure!(from.email.to_string() == "a@b.com");
    ensure!(from.name.as_deref() == Some("A"));
    ensure!(mailer.always(AddressKind::ReplyTo).is_none());
    ensure!(mailer.always(AddressKind::To).is_none());
    Ok(())
}

#[rstest]
fn smtp_mailer_builds_from_resolved_options(defaults: StaticDefaults) -> Result<()> {
    let factory = MailerFactory::new(PlainMailer, defaults);
    let call_site = map(json!({
        "secure": "tls",
        "user": "mailer",
        "password": "secret",
        "timeout": 2,
        "from": {"address": "noreply@example.com", "name": "Example"}
    }));
    let settings = factory.settings(&call_site)?;
    ensure!(settings.port == 587);
    ensure!(settings.credentials().is_some());
    ensure!(settings.stream.as_ref().is_some_and(|s| !s.verify_peer));

    let mailer = factory.mailer(&call_site)?;
    ensure!(mailer.always(AddressKind::From).is_some());
    Ok(())
}

#[rstest]
fn concurrent_resolutions_do_not_interfere(defaults: StaticDefaults) -> Result<()> {
    let factory = Arc::new(MailerFactory::new(PlainMailer, defaults));
    let handles: Vec<_> = (0..8_u16)
        .map(|offset| {
            let shared = Arc::clone(&factory);
            thread::spawn(move || {
                let port = 2500 + offset;
                let resolved = shared.options(&map(json!({"port": port})));
                (port, resolved.map(|m| m.get("port").cloned()))
            })
        })
        .collect();

    for handle in handles {
        let (port, resolved) = handle
            .join()
            .map_err(|_| anyhow!("resolution thread panicked"))?;
        ensure!(resolved? == Some(json!(port)));
    }
    Ok(())
}
