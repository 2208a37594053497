#![deny(missing_docs)]

//! # JSON Schema → OpenAPI Schema
//!
//! Rewrites draft JSON Schema conventions into OpenAPI 3.0 Schema Objects:
//!
//! - `type: [T, "null"]` becomes `type: T` + `nullable: true`; several non-null
//!   types become an `anyOf` of single-type branches.
//! - `{"type": "null"}` branches of `oneOf`/`anyOf` are folded into `nullable`.
//! - `const` becomes a single-value `enum`.
//! - `examples` arrays collapse into `example`.
//! - Numeric `exclusiveMinimum`/`exclusiveMaximum` become the boolean form.
//! - Tuple `items` arrays collapse into a single item schema.
//! - Keywords OpenAPI does not know are dropped.
//!
//! `#/definitions/...` references are left alone; see [`crate::converter::refs`].

use crate::converter::SchemaConverter;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use serde_json::{json, Map, Value};

/// JSON Schema keywords without an OpenAPI 3.0 equivalent.
const UNSUPPORTED_KEYWORDS: &[&str] = &[
    "$schema",
    "$id",
    "$comment",
    "patternProperties",
    "additionalItems",
    "dependencies",
    "dependentSchemas",
    "dependentRequired",
    "contains",
    "propertyNames",
    "if",
    "then",
    "else",
    "unevaluatedProperties",
    "unevaluatedItems",
    "contentMediaType",
    "contentEncoding",
];

/// Default [`SchemaConverter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaConverter;

#[async_trait]
impl SchemaConverter for JsonSchemaConverter {
    async fn convert(&self, schema: Value) -> AppResult<Value> {
        convert_schema(schema)
    }
}

/// Converts one draft schema tree.
///
/// Fails when a schema position holds something other than an object or a
/// boolean, or when `type` is malformed.
pub fn convert_schema(mut schema: Value) -> AppResult<Value> {
    convert_node(&mut schema)?;
    Ok(schema)
}

fn convert_node(value: &mut Value) -> AppResult<()> {
    if let Value::Bool(flag) = value {
        *value = bool_schema(*flag);
        return Ok(());
    }
    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(AppError::Conversion(format!(
                "expected a schema object, found `{}`",
                other
            )))
        }
    };

    for keyword in UNSUPPORTED_KEYWORDS {
        map.remove(*keyword);
    }
    convert_const(map);
    convert_examples(map);
    convert_exclusive_bound(map, "exclusiveMinimum", "minimum");
    convert_exclusive_bound(map, "exclusiveMaximum", "maximum");
    convert_type(map)?;
    fold_null_branches(map);
    collapse_tuple_items(map);

    if let Some(props) = map.get_mut("properties") {
        let props = props.as_object_mut().ok_or_else(|| {
            AppError::Conversion("`properties` must be an object".to_string())
        })?;
        for v in props.values_mut() {
            convert_node(v)?;
        }
    }
    for key in ["definitions", "$defs"] {
        if let Some(defs) = map.get_mut(key).and_then(|v| v.as_object_mut()) {
            for v in defs.values_mut() {
                convert_node(v)?;
            }
        }
    }
    if let Some(items) = map.get_mut("items") {
        convert_node(items)?;
    }
    if let Some(not_val) = map.get_mut("not") {
        convert_node(not_val)?;
    }
    if let Some(additional) = map.get_mut("additionalProperties") {
        if !additional.is_boolean() {
            convert_node(additional)?;
        }
    }
    for key in ["allOf", "anyOf", "oneOf"] {
        if let Some(branches) = map.get_mut(key) {
            let branches = branches.as_array_mut().ok_or_else(|| {
                AppError::Conversion(format!("`{}` must be an array", key))
            })?;
            for v in branches.iter_mut() {
                convert_node(v)?;
            }
        }
    }
    Ok(())
}

/// `true` accepts anything, `false` nothing.
fn bool_schema(flag: bool) -> Value {
    if flag {
        json!({})
    } else {
        json!({ "not": {} })
    }
}

fn convert_type(map: &mut Map<String, Value>) -> AppResult<()> {
    let types: Vec<String> = match map.get("type") {
        None => return Ok(()),
        Some(Value::String(ty)) if ty == "null" => Vec::new(),
        Some(Value::String(_)) => return Ok(()),
        Some(Value::Array(types)) => types
            .iter()
            .map(|t| {
                t.as_str().map(str::to_string).ok_or_else(|| {
                    AppError::Conversion(format!("invalid entry `{}` in `type`", t))
                })
            })
            .collect::<AppResult<Vec<String>>>()?
            .into_iter()
            .filter(|t| t != "null")
            .collect(),
        Some(other) => {
            return Err(AppError::Conversion(format!(
                "`type` must be a string or an array, found `{}`",
                other
            )))
        }
    };

    let had_null = match map.get("type") {
        Some(Value::String(ty)) => ty == "null",
        Some(Value::Array(entries)) => entries.iter().any(|t| t == "null"),
        _ => false,
    };

    map.remove("type");
    match types.as_slice() {
        [] => {}
        [single] => {
            map.insert("type".to_string(), json!(single));
        }
        many => {
            let branches: Vec<Value> = many
                .iter()
                .map(|t| match t.as_str() {
                    "array" => json!({ "type": t, "items": {} }),
                    _ => json!({ "type": t }),
                })
                .collect();
            if map.contains_key("anyOf") {
                let all_of = map
                    .entry("allOf")
                    .or_insert_with(|| Value::Array(Vec::new()));
                if let Some(all_of) = all_of.as_array_mut() {
                    all_of.push(json!({ "anyOf": branches }));
                }
            } else {
                map.insert("anyOf".to_string(), Value::Array(branches));
            }
        }
    }
    if had_null {
        map.insert("nullable".to_string(), json!(true));
    }
    Ok(())
}

fn fold_null_branches(map: &mut Map<String, Value>) {
    let null_branch = json!({ "type": "null" });
    let mut nullable = false;
    for key in ["anyOf", "oneOf"] {
        let emptied = match map.get_mut(key).and_then(|v| v.as_array_mut()) {
            Some(branches) => {
                let before = branches.len();
                branches.retain(|b| *b != null_branch);
                nullable |= branches.len() != before;
                branches.is_empty()
            }
            None => false,
        };
        if emptied {
            map.remove(key);
        }
    }
    if nullable {
        map.insert("nullable".to_string(), json!(true));
    }
}

fn convert_const(map: &mut Map<String, Value>) {
    if let Some(const_val) = map.remove("const") {
        if !map.contains_key("type") {
            if let Some(type_name) = infer_schema_type(&const_val) {
                map.insert("type".to_string(), json!(type_name));
            }
        }
        if !map.contains_key("enum") {
            map.insert("enum".to_string(), Value::Array(vec![const_val]));
        }
    }
}

fn infer_schema_type(value: &Value) -> Option<&'static str> {
    match value {
        Value::String(_) => Some("string"),
        Value::Bool(_) => Some("boolean"),
        Value::Number(num) if num.is_i64() || num.is_u64() => Some("integer"),
        Value::Number(_) => Some("number"),
        Value::Array(_) => Some("array"),
        Value::Object(_) => Some("object"),
        Value::Null => None,
    }
}

fn convert_examples(map: &mut Map<String, Value>) {
    if !matches!(map.get("examples"), Some(Value::Array(_))) {
        return;
    }
    if let Some(Value::Array(mut examples)) = map.remove("examples") {
        if !map.contains_key("example") && !examples.is_empty() {
            map.insert("example".to_string(), examples.swap_remove(0));
        }
    }
}

fn convert_exclusive_bound(map: &mut Map<String, Value>, exclusive: &str, bound: &str) {
    if !matches!(map.get(exclusive), Some(Value::Number(_))) {
        return;
    }
    if let Some(limit) = map.remove(exclusive) {
        map.insert(bound.to_string(), limit);
        map.insert(exclusive.to_string(), json!(true));
    }
}

fn collapse_tuple_items(map: &mut Map<String, Value>) {
    if !matches!(map.get("items"), Some(Value::Array(_))) {
        return;
    }
    if let Some(Value::Array(mut items)) = map.remove("items") {
        items.dedup();
        match items.len() {
            0 => {}
            1 => {
                map.insert("items".to_string(), items.swap_remove(0));
            }
            _ => {
                map.insert("items".to_string(), json!({ "anyOf": items }));
            }
        }
    }
}
