//! Empty `required` stripping.
//!
//! An empty `required` list is legal in OpenAPI 3.x but rejected by Swagger 2
//! tooling and several stricter validators.

use serde_json::{Map, Value};

fn is_reference(map: &Map<String, Value>) -> bool {
    map.contains_key("$ref")
}

/// Removes every empty `required` array reachable through `items`,
/// `properties`, `oneOf`, `anyOf` and `allOf`. Reference nodes are left as is.
pub fn strip_empty_required(schema: &mut Value) {
    let map = match schema {
        Value::Object(map) if !is_reference(map) => map,
        _ => return,
    };

    if map.get("type").and_then(Value::as_str) == Some("array") {
        if let Some(items) = map.get_mut("items") {
            strip_empty_required(items);
        }
        return;
    }

    if let Some(props) = map.get_mut("properties").and_then(Value::as_object_mut) {
        for v in props.values_mut() {
            strip_empty_required(v);
        }
    }
    for key in ["oneOf", "anyOf", "allOf"] {
        if let Some(branches) = map.get_mut(key).and_then(Value::as_array_mut) {
            for v in branches.iter_mut() {
                strip_empty_required(v);
            }
        }
    }

    let empty = map
        .get("required")
        .and_then(Value::as_array)
        .is_some_and(Vec::is_empty);
    if empty {
        map.remove("required");
    }
}
