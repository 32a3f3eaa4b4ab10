//! Deep-merge primitives for layered mailer configuration.
//!
//! Layers are represented as [`ConfigMap`] values so defaults loaded from
//! files, mappings computed by variant hooks and call-site options share a
//! single shape. Merging never mutates its inputs: [`deep_merge`] clones the
//! base mapping and overlays the higher-precedence mapping onto the copy.
//!
//! # Example
//!
//! ```rust
//! use dynamic_mailer::merge::{LayerStack, into_config_map};
//! use serde_json::json;
//!
//! let mut stack = LayerStack::new();
//! stack.push_defaults(into_config_map(json!({"host": "a", "port": 25}))?);
//! stack.push_variant(into_config_map(json!({"port": 2525}))?);
//!
//! let merged = stack.merge();
//! assert_eq!(merged.get("port"), Some(&json!(2525)));
//! # Ok::<_, std::sync::Arc<dynamic_mailer::MailerError>>(())
//! ```

mod layer;
mod stack;

pub use layer::{LayerProvenance, MergeLayer};
pub use stack::LayerStack;

use serde_json::{Map, Value};

use crate::{MailerError, MailerResult};

/// String-keyed configuration mapping. Values may nest further mappings.
pub type ConfigMap = Map<String, Value>;

/// Deep-merge `overlay` onto a copy of `base`.
///
/// Behaviour:
/// - Keys present only in `base` are kept.
/// - When both sides hold a mapping for a key, the mappings merge
///   recursively.
/// - Otherwise the `overlay` value replaces the `base` value, including
///   arrays and `null`.
///
/// Arrays are replaced wholesale rather than merged index by index, so an
/// overlay `[x]` over a base `[a, b]` yields `[x]`, not `[x, b]`.
///
/// # Examples
///
/// ```rust
/// use dynamic_mailer::merge::{deep_merge, into_config_map};
/// use serde_json::json;
///
/// let base = into_config_map(json!({
///     "stream": {"ssl": {"verify_peer": false, "verify_peer_name": false}}
/// }))?;
/// let overlay = into_config_map(json!({"stream": {"ssl": {"verify_peer": true}}}))?;
///
/// let merged = deep_merge(&base, &overlay);
/// assert_eq!(
///     merged["stream"]["ssl"],
///     json!({"verify_peer": true, "verify_peer_name": false})
/// );
/// // Inputs are left untouched.
/// assert_eq!(base["stream"]["ssl"]["verify_peer"], json!(false));
/// # Ok::<_, std::sync::Arc<dynamic_mailer::MailerError>>(())
/// ```
#[must_use]
pub fn deep_merge(base: &ConfigMap, overlay: &ConfigMap) -> ConfigMap {
    let mut merged = base.clone();
    merge_map(&mut merged, overlay.clone());
    merged
}

/// Overlay `layer` onto `target`, updating `target` in place.
///
/// Merging a mapping into a non-mapping target first resets the target to an
/// empty mapping, so the result equals the incoming mapping. Scalars and
/// arrays replace `target` wholesale.
///
/// # Examples
///
/// ```rust
/// use dynamic_mailer::merge::merge_value;
/// use serde_json::json;
///
/// let mut acc = json!({"host": "a", "stream": {"ssl": {"verify_peer": false}}});
/// merge_value(&mut acc, json!({"stream": {"ssl": {"cafile": "/etc/ca.pem"}}}));
/// assert_eq!(
///     acc["stream"]["ssl"],
///     json!({"verify_peer": false, "cafile": "/etc/ca.pem"})
/// );
///
/// merge_value(&mut acc, json!({"stream": "off"}));
/// assert_eq!(acc["stream"], json!("off"));
/// ```
pub fn merge_value(target: &mut Value, layer: Value) {
    match layer {
        Value::Object(map) => {
            if !target.is_object() {
                *target = Value::Object(Map::new());
            }
            if let Value::Object(target_map) = target {
                merge_map(target_map, map);
            }
        }
        _ => *target = layer,
    }
}

fn merge_map(target: &mut ConfigMap, layer: ConfigMap) {
    for (key, value) in layer {
        match target.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target.insert(key, value);
            }
        }
    }
}

/// Convert a JSON value into a [`ConfigMap`].
///
/// `null` converts to an empty mapping so optional option bags can be passed
/// straight through.
///
/// # Errors
///
/// Returns [`MailerError::Validation`] when `value` is neither a mapping nor
/// `null`.
///
/// # Examples
///
/// ```rust
/// use dynamic_mailer::merge::into_config_map;
/// use serde_json::json;
///
/// assert_eq!(into_config_map(json!({"port": 25}))?.len(), 1);
/// assert!(into_config_map(json!(null))?.is_empty());
/// assert!(into_config_map(json!([1, 2])).is_err());
/// # Ok::<_, std::sync::Arc<dynamic_mailer::MailerError>>(())
/// ```
pub fn into_config_map(value: Value) -> MailerResult<ConfigMap> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(ConfigMap::new()),
        other => Err(MailerError::validation_arc(
            "<root>",
            format!("expected a mapping, found {}", value_kind(&other)),
        )),
    }
}

/// Human-readable name of a JSON value's type, used in validation messages.
pub(crate) const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}
