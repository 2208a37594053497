#![deny(missing_docs)]

//! # Reference Rewriting
//!
//! Walks a converted schema and retargets every draft `#/definitions/<name>`
//! pointer at `#/components/schemas/...`.
//!
//! A `<name>` that is a collection or global slug resolves to that entity's
//! singular schema name (`orders` -> `Order`); any other name (a field
//! definition key) is kept verbatim.

use crate::entity::HostConfig;
use crate::naming;
use serde_json::Value;
use std::collections::HashSet;

/// Prefix of draft-internal references.
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Prefix of OpenAPI component schema references.
pub const COMPONENTS_PREFIX: &str = "#/components/schemas/";

/// Rewrites `$ref` targets against the host configuration.
#[derive(Debug)]
pub struct ReferenceRewriter<'a> {
    config: &'a HostConfig,
    field_definitions: HashSet<String>,
}

impl<'a> ReferenceRewriter<'a> {
    /// Creates a rewriter aware of the given field definition keys.
    pub fn new<I, S>(config: &'a HostConfig, field_definitions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            config,
            field_definitions: field_definitions.into_iter().map(Into::into).collect(),
        }
    }

    /// Component schema name for a draft definition name.
    ///
    /// Unknown names fall back to the raw name.
    pub fn resolve_name(&self, name: &str) -> String {
        if let Some(entity) = self.config.find_entity(name) {
            return naming::singular_schema_name(entity);
        }
        if !self.field_definitions.contains(name) {
            tracing::warn!(
                reference = name,
                "reference does not name a collection, global or field definition; keeping it as-is"
            );
        }
        name.to_string()
    }

    /// Rewrites every `$ref` in `schema` in place.
    ///
    /// Literal values (`example`, `examples`, `default`, `enum`) are skipped,
    /// but only where they are keywords of a schema object; entries of
    /// `properties` and definition maps are always visited.
    pub fn rewrite(&self, schema: &mut Value) {
        match schema {
            Value::Object(map) => {
                if let Some(Value::String(target)) = map.get_mut("$ref") {
                    if let Some(name) = target.strip_prefix(DEFINITIONS_PREFIX) {
                        let rewritten =
                            format!("{}{}", COMPONENTS_PREFIX, self.resolve_name(name));
                        *target = rewritten;
                    }
                }
                for (key, v) in map.iter_mut() {
                    match key.as_str() {
                        "example" | "examples" | "default" | "enum" => {}
                        "properties" | "definitions" | "$defs" => self.rewrite_entries(v),
                        _ => self.rewrite(v),
                    }
                }
            }
            Value::Array(items) => {
                for v in items.iter_mut() {
                    self.rewrite(v);
                }
            }
            _ => {}
        }
    }

    /// Visits every value of a name -> schema map.
    fn rewrite_entries(&self, entries: &mut Value) {
        if let Value::Object(map) = entries {
            for v in map.values_mut() {
                self.rewrite(v);
            }
        }
    }
}
