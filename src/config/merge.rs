//! Deep merge of parsed configuration values.
//!
//! Objects merge field-by-field. Arrays are replaced entirely, never
//! concatenated or merged element-wise.

use serde_json::Value;

/// Deep merge two JSON values, with `overlay` taking precedence over `base`.
///
/// - Objects are merged recursively: keys in overlay override keys in base
/// - Arrays, strings, numbers, booleans are replaced entirely
/// - If overlay is null, the base value is preserved (null means "not specified")
///
/// # Example
/// ```
/// use serde_json::json;
/// use configseek::config::deep_merge;
///
/// let base = json!({
///     "server": { "port": 8080, "host": "localhost" },
///     "features": ["a", "b"]
/// });
/// let overlay = json!({
///     "server": { "port": 9000 },
///     "features": ["c"]
/// });
/// let result = deep_merge(base, overlay);
/// assert_eq!(
///     result,
///     json!({ "server": { "port": 9000, "host": "localhost" }, "features": ["c"] })
/// );
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged_value = if let Some(base_value) = base_map.remove(&key) {
                    deep_merge(base_value, overlay_value)
                } else {
                    overlay_value
                };
                base_map.insert(key, merged_value);
            }
            Value::Object(base_map)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

/// Merge multiple values in order, with later values taking precedence.
pub fn deep_merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    values.into_iter().fold(Value::Null, deep_merge)
}

/// Combine loaded layers, strongest first, over `defaults`.
///
/// An earlier layer keeps its value wherever a later one also sets the key.
/// `defaults` only fills keys no layer sets.
pub fn merge_layers(layers: Vec<Value>, defaults: Value) -> Value {
    deep_merge_all(std::iter::once(defaults).chain(layers.into_iter().rev()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_simple_objects() {
        let result = deep_merge(json!({"a": 1, "b": 2}), json!({"b": 3, "c": 4}));
        assert_eq!(result, json!({"a": 1, "b": 3, "c": 4}));
    }

    #[test]
    fn test_arrays_replaced_not_merged() {
        let result = deep_merge(json!({"items": [1, 2, 3]}), json!({"items": [4, 5]}));
        assert_eq!(result, json!({"items": [4, 5]}));
    }

    #[test]
    fn test_null_preserves_base() {
        let base = json!({"a": 1, "b": {"c": 2}});
        let overlay = json!({"a": null, "b": {"c": null}});
        assert_eq!(deep_merge(base.clone(), overlay), base);
    }

    #[test]
    fn test_earlier_layer_wins() {
        let layers = vec![
            json!({"server": {"port": 3000}, "plugins": ["a"]}),
            json!({"server": {"port": 4000, "tls": true}, "plugins": ["b", "c"]}),
        ];
        let defaults = json!({"server": {"port": 8080, "host": "local"}, "debug": false});
        assert_eq!(
            merge_layers(layers, defaults),
            json!({
                "server": {"port": 3000, "tls": true, "host": "local"},
                "plugins": ["a"],
                "debug": false
            })
        );
    }

    #[test]
    fn test_top_level_array_replaces_defaults() {
        let merged = merge_layers(vec![json!([1, 2])], json!([3]));
        assert_eq!(merged, json!([1, 2]));
    }

    #[test]
    fn test_no_layers_yields_defaults() {
        assert_eq!(merge_layers(Vec::new(), json!({"a": 1})), json!({"a": 1}));
        assert_eq!(merge_layers(Vec::new(), Value::Null), Value::Null);
    }
}
