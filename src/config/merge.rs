//! Layer merging and dotted-path overrides
//!
//! - Tables merge key by key
//! - Arrays and scalars from the later layer replace the earlier value

use serde_json::{Map, Value};

/// Merge `overlay` into `base` in place.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Merge layers in precedence order (last wins)
pub fn merge_layers(layers: Vec<Value>) -> Value {
    let mut merged = Value::Object(Map::new());
    for layer in layers {
        deep_merge(&mut merged, layer);
    }
    merged
}

/// Set `path` (dot-separated) to `value`, creating intermediate tables.
///
/// A non-table value in the middle of the path is replaced by a table.
pub fn set_path(root: &mut Value, path: &str, value: Value) {
    let mut current = root;
    let mut parts = path.split('.').peekable();

    while let Some(part) = parts.next() {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Some(map) = current.as_object_mut() else {
            return;
        };

        if parts.peek().is_none() {
            map.insert(part.to_string(), value);
            return;
        }
        current = map
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
}

/// Parse a `key=value` override.
///
/// Values are read as booleans or integers when they look like one, and as
/// strings otherwise.
pub fn parse_override(pair: &str) -> Option<(String, Value)> {
    let (key, raw) = pair.split_once('=')?;
    let key = key.trim();
    if key.is_empty() || key.split('.').any(str::is_empty) {
        return None;
    }

    let raw = raw.trim();
    let value = match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => match raw.parse::<u64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(raw.to_string()),
        },
    };
    Some((key.to_string(), value))
}
