//! Global addresses carried in the merged configuration.
//!
//! The `from`, `reply_to` and `to` keys may hold a mapping with an `address`
//! and an optional `name`. Such entries become global addresses on the
//! mailer. Any other shape is ignored.

use std::fmt;

use lettre::message::Mailbox;
use serde_json::Value;

use crate::{ConfigMap, MailerResult, MailerResultExt};

/// Category of a global address.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum AddressKind {
    /// Sender applied to every message.
    From,
    /// Reply-to applied to every message.
    ReplyTo,
    /// Recipient that replaces the recipients of every message.
    To,
}

impl AddressKind {
    /// Every kind, in registration order.
    pub const ALL: [Self; 3] = [Self::From, Self::ReplyTo, Self::To];

    /// Configuration key holding this kind of address.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::From => "from",
            Self::ReplyTo => "reply_to",
            Self::To => "to",
        }
    }
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// An address registered from configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GlobalAddress {
    /// Category the address applies to.
    pub kind: AddressKind,
    /// Email address as configured.
    pub address: String,
    /// Display name, when configured.
    pub name: Option<String>,
}

impl GlobalAddress {
    /// Parse the address into a `lettre` mailbox.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MailerError::Address`] when the address is not a
    /// valid email address.
    pub fn mailbox(&self) -> MailerResult<Mailbox> {
        let email = self.address.parse::<lettre::Address>().into_mailer()?;
        Ok(Mailbox::new(self.name.clone(), email))
    }
}

/// Global addresses found in a merged configuration.
///
/// # Examples
///
/// ```rust
/// use dynamic_mailer::{AddressKind, GlobalAddresses, into_config_map};
/// use serde_json::json;
///
/// let config = into_config_map(json!({
///     "from": {"address": "a@b.com", "name": "A"},
///     "to": "ignored@b.com"
/// }))?;
/// let addresses = GlobalAddresses::from_config(&config);
/// let from = addresses.get(AddressKind::From).map(|a| a.address.as_str());
/// assert_eq!(from, Some("a@b.com"));
/// assert!(addresses.get(AddressKind::To).is_none());
/// # Ok::<_, std::sync::Arc<dynamic_mailer::MailerError>>(())
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GlobalAddresses {
    entries: Vec<GlobalAddress>,
}

impl GlobalAddresses {
    /// Collect the global addresses present in `config`.
    #[must_use]
    pub fn from_config(config: &ConfigMap) -> Self {
        let entries = AddressKind::ALL
            .into_iter()
            .filter_map(|kind| entry(config, kind))
            .collect();
        Self { entries }
    }

    /// The address registered for `kind`, if any.
    #[must_use]
    pub fn get(&self, kind: AddressKind) -> Option<&GlobalAddress> {
        self.entries.iter().find(|entry| entry.kind == kind)
    }

    /// Iterate over the registered addresses.
    pub fn iter(&self) -> impl Iterator<Item = &GlobalAddress> {
        self.entries.iter()
    }

    /// Number of registered addresses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no address was registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn entry(config: &ConfigMap, kind: AddressKind) -> Option<GlobalAddress> {
    let Some(Value::Object(table)) = config.get(kind.key()) else {
        return None;
    };
    match table.get("address") {
        Some(Value::String(address)) => Some(GlobalAddress {
            kind,
            address: address.clone(),
            name: table.get("name").and_then(Value::as_str).map(str::to_owned),
        }),
        None | Some(Value::Null) => None,
        Some(_) => {
            tracing::warn!(%kind, "ignoring global address whose 'address' is not a string");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::{MailerError, into_config_map};

    fn addresses(value: Value) -> GlobalAddresses {
        let config =
            into_config_map(value).unwrap_or_else(|err| panic!("fixture must be a mapping: {err}"));
        GlobalAddresses::from_config(&config)
    }

    #[rstest]
    fn registers_mapping_with_address_and_name() {
        let found = addresses(json!({"from": {"address": "a@b.com", "name": "A"}}));
        assert_eq!(
            found.get(AddressKind::From),
            Some(&GlobalAddress {
                kind: AddressKind::From,
                address: "a@b.com".into(),
                name: Some("A".into()),
            })
        );
        assert_eq!(found.len(), 1);
    }

    #[rstest]
    #[case::plain_string(json!({"from": "a@b.com"}))]
    #[case::missing_address(json!({"from": {"name": "A"}}))]
    #[case::numeric_address(json!({"from": {"address": 42}}))]
    #[case::absent(json!({"host": "smtp.example.com"}))]
    fn other_shapes_are_ignored(#[case] config: Value) {
        assert!(addresses(config).is_empty());
    }

    #[rstest]
    fn collects_every_kind_in_order() {
        let found = addresses(json!({
            "to": {"address": "qa@b.com"},
            "reply_to": {"address": "support@b.com", "name": "Support"},
            "from": {"address": "noreply@b.com"}
        }));
        let kinds: Vec<_> = found.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![AddressKind::From, AddressKind::ReplyTo, AddressKind::To]
        );
        assert_eq!(
            found.get(AddressKind::To).and_then(|a| a.name.clone()),
            None
        );
    }

    #[rstest]
    fn mailbox_carries_display_name() {
        let found = addresses(json!({"from": {"address": "a@b.com", "name": "A"}}));
        let mailbox = found
            .get(AddressKind::From)
            .map(GlobalAddress::mailbox)
            .unwrap_or_else(|| panic!("from address missing"))
            .unwrap_or_else(|err| panic!("mailbox failed: {err}"));
        assert_eq!(mailbox.to_string(), "A <a@b.com>");
    }

    #[rstest]
    fn invalid_addresses_fail_when_parsed() {
        let found = addresses(json!({"from": {"address": "not an address"}}));
        let err = found
            .get(AddressKind::From)
            .map(GlobalAddress::mailbox)
            .and_then(Result::err)
            .unwrap_or_else(|| panic!("expected an address error"));
        assert!(matches!(&*err, MailerError::Address(_)));
    }
}
