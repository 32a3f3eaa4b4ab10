//! Fixture helpers for building configuration mappings from JSON literals.

use serde_json::{Map, Value};

/// Convert a JSON object literal into a configuration mapping.
///
/// # Panics
///
/// Panics when `value` is not a JSON object; fixtures are expected to be
/// written as `json!({...})` literals.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use dynamic_mailer_test_helpers::config::map;
///
/// let options = map(json!({"port": 2525}));
/// assert_eq!(options.get("port"), Some(&json!(2525)));
/// ```
#[must_use]
#[track_caller]
pub fn map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture must be a JSON object, got {other}"),
    }
}

/// Read a dotted path such as `stream.ssl.verify_peer` from a mapping.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use dynamic_mailer_test_helpers::config::{map, path};
///
/// let options = map(json!({"stream": {"ssl": {"verify_peer": false}}}));
/// assert_eq!(path(&options, "stream.ssl.verify_peer"), Some(&json!(false)));
/// assert_eq!(path(&options, "stream.tcp"), None);
/// ```
#[must_use]
pub fn path<'a>(mapping: &'a Map<String, Value>, dotted: &str) -> Option<&'a Value> {
    let mut segments = dotted.split('.');
    let first = mapping.get(segments.next()?)?;
    segments.try_fold(first, |value, segment| value.get(segment))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{map, path};

    #[test]
    fn path_walks_nested_mappings() {
        let options = map(json!({"a": {"b": {"c": 1}}}));
        assert_eq!(path(&options, "a.b.c"), Some(&json!(1)));
        assert_eq!(path(&options, "a.x"), None);
    }

    #[test]
    #[should_panic(expected = "fixture must be a JSON object")]
    fn map_rejects_scalars() {
        let _options = map(json!(3));
    }
}
