#![deny(missing_docs)]

//! # Entity Models
//!
//! Read-only descriptions of the host framework's content model: collections,
//! globals and their (flattened) fields. These are deserialized from the host
//! configuration file and never mutated by the generators.

use crate::access::{AccessRule, AccessRules, Action};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether an entity is a repeatable collection or a singleton global.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    /// A collection of documents (`/{slug}` CRUD routes).
    #[default]
    Collection,
    /// A singleton document (`/globals/{slug}` routes).
    Global,
}

/// Optional human readable labels of an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    /// Singular label, e.g. "Order".
    pub singular: Option<String>,
    /// Plural label, e.g. "Orders".
    pub plural: Option<String>,
}

/// A collection or global definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDefinition {
    /// Unique slug, also used as the route segment.
    pub slug: String,
    /// Collection or global. Assigned by [`HostConfig`] based on the list it lives in.
    #[serde(default, skip_deserializing)]
    pub kind: EntityKind,
    /// Optional labels overriding slug-derived names.
    #[serde(default)]
    pub labels: Option<Labels>,
    /// Optional description, injected into the primary schema.
    #[serde(default)]
    pub description: Option<String>,
    /// Ordered field list with presentational nesting already expanded.
    #[serde(default, alias = "fields")]
    pub flattened_fields: Vec<FieldDefinition>,
    /// Access rules per action.
    #[serde(default)]
    pub access: AccessRules,
    /// Free-form custom metadata (`custom.openapi.example(s)` is honoured).
    #[serde(default)]
    pub custom: Option<Value>,
}

impl EntityDefinition {
    /// Creates a collection definition with default access and no fields.
    pub fn collection(slug: impl Into<String>) -> Self {
        Self::new(slug, EntityKind::Collection)
    }

    /// Creates a global definition with default access and no fields.
    pub fn global(slug: impl Into<String>) -> Self {
        Self::new(slug, EntityKind::Global)
    }

    fn new(slug: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            slug: slug.into(),
            kind,
            labels: None,
            description: None,
            flattened_fields: Vec::new(),
            access: AccessRules::default(),
            custom: None,
        }
    }

    /// Appends a field.
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.flattened_fields.push(field);
        self
    }

    /// Sets the access rule of one action.
    pub fn with_access(mut self, action: Action, rule: AccessRule) -> Self {
        self.access.set(action, rule);
        self
    }

    /// Sets explicit labels.
    pub fn with_labels(mut self, singular: impl Into<String>, plural: impl Into<String>) -> Self {
        self.labels = Some(Labels {
            singular: Some(singular.into()),
            plural: Some(plural.into()),
        });
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the custom metadata blob.
    pub fn with_custom(mut self, custom: Value) -> Self {
        self.custom = Some(custom);
        self
    }

    /// Returns `(example, examples)` from `custom.openapi`, when present.
    pub fn openapi_examples(&self) -> (Option<&Value>, Option<&Value>) {
        let openapi = self.custom.as_ref().and_then(|c| c.get("openapi"));
        match openapi {
            Some(o) => (o.get("example"), o.get("examples")),
            None => (None, None),
        }
    }
}

/// Supported field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    /// Single line text.
    Text,
    /// Multi line text.
    Textarea,
    /// E-mail address.
    Email,
    /// Source code snippet.
    Code,
    /// Numeric value.
    Number,
    /// Boolean flag.
    Checkbox,
    /// ISO-8601 timestamp.
    Date,
    /// One (or many) of a fixed set of options.
    Select,
    /// Exactly one of a fixed set of options.
    Radio,
    /// Reference to documents of another collection.
    Relationship,
    /// Reference to an upload collection document.
    Upload,
    /// Repeated list of nested rows.
    Array,
    /// Named nested object.
    Group,
    /// Arbitrary JSON.
    Json,
    /// GeoJSON-like `[lng, lat]` pair.
    Point,
    /// Rich text document tree.
    RichText,
}

/// A select/radio option: either a bare value or a labelled value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldOption {
    /// Bare value.
    Value(String),
    /// Value with a display label.
    Labelled {
        /// Display label.
        label: String,
        /// Stored value.
        value: String,
    },
}

impl FieldOption {
    /// The stored value of the option.
    pub fn value(&self) -> &str {
        match self {
            FieldOption::Value(v) => v,
            FieldOption::Labelled { value, .. } => value,
        }
    }
}

/// A single (flattened) field of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Property name.
    pub name: String,
    /// Field kind.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether a value is mandatory.
    #[serde(default)]
    pub required: bool,
    /// Hidden fields never reach the API schema.
    #[serde(default)]
    pub hidden: bool,
    /// Multiple values (select, relationship, upload).
    #[serde(default)]
    pub has_many: bool,
    /// Options of select/radio fields.
    #[serde(default)]
    pub options: Vec<FieldOption>,
    /// Target slugs of relationship/upload fields.
    #[serde(default)]
    pub relation_to: Vec<String>,
    /// Nested fields of array/group fields.
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    /// Promotes the field shape into a named, reusable field definition.
    #[serde(default)]
    pub interface_name: Option<String>,
    /// Optional admin description.
    #[serde(default)]
    pub description: Option<String>,
}

impl FieldDefinition {
    /// Creates an optional, visible field.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            hidden: false,
            has_many: false,
            options: Vec::new(),
            relation_to: Vec::new(),
            fields: Vec::new(),
            interface_name: None,
            description: None,
        }
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the field as hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Allows multiple values.
    pub fn has_many(mut self) -> Self {
        self.has_many = true;
        self
    }

    /// Adds a relationship target.
    pub fn relation_to(mut self, slug: impl Into<String>) -> Self {
        self.relation_to.push(slug.into());
        self
    }

    /// Adds a bare option value.
    pub fn option(mut self, value: impl Into<String>) -> Self {
        self.options.push(FieldOption::Value(value.into()));
        self
    }

    /// Adds a nested field.
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Sets the interface name.
    pub fn interface_name(mut self, name: impl Into<String>) -> Self {
        self.interface_name = Some(name.into());
        self
    }
}

/// On-disk layout of the host configuration.
#[derive(Debug, Default, Deserialize)]
struct HostConfigFile {
    #[serde(default)]
    collections: Vec<EntityDefinition>,
    #[serde(default)]
    globals: Vec<EntityDefinition>,
}

/// The host framework configuration: every collection and global.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "HostConfigFile")]
pub struct HostConfig {
    /// All collections, in declaration order.
    pub collections: Vec<EntityDefinition>,
    /// All globals, in declaration order.
    pub globals: Vec<EntityDefinition>,
}

impl From<HostConfigFile> for HostConfig {
    fn from(file: HostConfigFile) -> Self {
        HostConfig::new(file.collections, file.globals)
    }
}

impl HostConfig {
    /// Builds a config, tagging every entry with the kind of the list it belongs to.
    pub fn new(collections: Vec<EntityDefinition>, globals: Vec<EntityDefinition>) -> Self {
        let collections = collections
            .into_iter()
            .map(|mut c| {
                c.kind = EntityKind::Collection;
                c
            })
            .collect();
        let globals = globals
            .into_iter()
            .map(|mut g| {
                g.kind = EntityKind::Global;
                g
            })
            .collect();
        Self {
            collections,
            globals,
        }
    }

    /// Finds a collection, or failing that a global, by slug.
    pub fn find_entity(&self, slug: &str) -> Option<&EntityDefinition> {
        self.collections
            .iter()
            .find(|c| c.slug == slug)
            .or_else(|| self.globals.iter().find(|g| g.slug == slug))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_host_config_assigns_kinds() {
        let raw = json!({
            "collections": [{ "slug": "orders" }],
            "globals": [{ "slug": "settings" }]
        });
        let config: HostConfig = serde_json::from_value(raw).unwrap();
        assert_eq!(config.collections[0].kind, EntityKind::Collection);
        assert_eq!(config.globals[0].kind, EntityKind::Global);
    }

    #[test]
    fn test_find_entity_prefers_collections() {
        let config = HostConfig::new(
            vec![EntityDefinition::collection("shared")],
            vec![EntityDefinition::global("shared"), EntityDefinition::global("nav")],
        );
        assert_eq!(
            config.find_entity("shared").map(|e| e.kind),
            Some(EntityKind::Collection)
        );
        assert_eq!(config.find_entity("nav").map(|e| e.kind), Some(EntityKind::Global));
        assert!(config.find_entity("missing").is_none());
    }

    #[test]
    fn test_field_deserialization() {
        let raw = json!({
            "name": "status",
            "type": "select",
            "required": true,
            "options": ["draft", { "label": "Live", "value": "live" }]
        });
        let field: FieldDefinition = serde_json::from_value(raw).unwrap();
        assert_eq!(field.field_type, FieldType::Select);
        assert!(field.required);
        assert!(!field.hidden);
        let values: Vec<&str> = field.options.iter().map(FieldOption::value).collect();
        assert_eq!(values, vec!["draft", "live"]);
    }

    #[test]
    fn test_fields_alias_and_examples() {
        let raw = json!({
            "slug": "products",
            "fields": [{ "name": "price", "type": "number" }],
            "custom": { "openapi": { "example": { "price": 10 } } }
        });
        let entity: EntityDefinition = serde_json::from_value(raw).unwrap();
        assert_eq!(entity.flattened_fields.len(), 1);
        let (example, examples) = entity.openapi_examples();
        assert_eq!(example, Some(&json!({ "price": 10 })));
        assert!(examples.is_none());
    }

    #[test]
    fn test_missing_custom_metadata_is_tolerated() {
        let entity = EntityDefinition::collection("pages").with_custom(json!({ "other": 1 }));
        assert_eq!(entity.openapi_examples(), (None, None));
    }
}
