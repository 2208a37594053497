#![deny(missing_docs)]

//! # Entity to Schema
//!
//! Turns a collection/global into its primary OpenAPI schema plus the named
//! field definitions it references.
//!
//! Pipeline per entity:
//! 1. drop hidden fields,
//! 2. ask the [`SchemaBuilder`] for a draft schema and field definition map,
//! 3. convert every draft with the [`SchemaConverter`],
//! 4. strip empty `required` lists,
//! 5. retarget `#/definitions/...` references,
//! 6. prefix the entity description.
//!
//! Builder and converter errors are returned unchanged.

pub mod builder;
pub mod filter;
pub mod openapi;
pub mod refs;
pub mod required;

use crate::entity::{EntityDefinition, HostConfig};
use crate::error::AppResult;
use crate::naming;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::{json, Map, Value};

pub use builder::DraftSchemaBuilder;
pub use filter::remove_hidden_fields;
pub use openapi::{convert_schema, JsonSchemaConverter};
pub use refs::ReferenceRewriter;
pub use required::strip_empty_required;

/// How descriptions should be rendered into the draft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DescriptionFormat {
    /// Plain text, markdown emphasis removed.
    #[default]
    Text,
    /// Markdown, kept verbatim.
    Markdown,
}

impl DescriptionFormat {
    /// Renders `description` in this format.
    pub fn render(&self, description: &str) -> String {
        match self {
            DescriptionFormat::Markdown => description.to_string(),
            DescriptionFormat::Text => ["**", "*", "`"]
                .iter()
                .fold(description.to_string(), |text, marker| strip_paired(&text, marker)),
        }
    }
}

/// Removes `marker` pairs that wrap a non-blank span, e.g. `*a*` but not `2 * 3`.
fn strip_paired(text: &str, marker: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find(marker) {
        let after = &rest[open + marker.len()..];
        match after.find(marker) {
            Some(close) if is_emphasis_span(&after[..close]) => {
                out.push_str(&rest[..open]);
                out.push_str(&after[..close]);
                rest = &after[close + marker.len()..];
            }
            _ => {
                out.push_str(&rest[..open + marker.len()]);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_emphasis_span(inner: &str) -> bool {
    !inner.is_empty()
        && !inner.starts_with(char::is_whitespace)
        && !inner.ends_with(char::is_whitespace)
}

/// Output of the host schema generator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftSchema {
    /// Draft JSON Schema of the entity.
    pub schema: Value,
    /// Named field shapes referenced from `schema` as `#/definitions/<name>`.
    pub field_definitions: IndexMap<String, Value>,
}

/// Converted schemas of one entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntitySchema {
    /// Primary OpenAPI schema of the entity.
    pub schema: Value,
    /// Converted field definitions, in generation order.
    pub field_definitions: IndexMap<String, Value>,
}

/// The host framework's JSON Schema generator.
pub trait SchemaBuilder: Send + Sync {
    /// Builds the draft schema of `entity`.
    fn build(
        &self,
        config: &HostConfig,
        entity: &EntityDefinition,
        format: DescriptionFormat,
    ) -> AppResult<DraftSchema>;
}

/// Converts a draft JSON Schema into an OpenAPI Schema Object.
#[async_trait]
pub trait SchemaConverter: Send + Sync {
    /// Converts one schema tree.
    async fn convert(&self, schema: Value) -> AppResult<Value>;
}

/// Converts `entity` into its OpenAPI schema and field definitions.
pub async fn entity_to_schema(
    config: &HostConfig,
    entity: &EntityDefinition,
    builder: &dyn SchemaBuilder,
    converter: &dyn SchemaConverter,
) -> AppResult<EntitySchema> {
    let mut visible = entity.clone();
    visible.flattened_fields = remove_hidden_fields(&entity.flattened_fields);

    let draft = builder.build(config, &visible, DescriptionFormat::Text)?;
    let rewriter = ReferenceRewriter::new(config, draft.field_definitions.keys().cloned());

    let mut schema = converter.convert(draft.schema).await?;

    let mut field_definitions = IndexMap::with_capacity(draft.field_definitions.len());
    for (key, definition) in draft.field_definitions {
        let mut converted = converter.convert(definition).await?;
        strip_empty_required(&mut converted);
        rewriter.rewrite(&mut converted);
        field_definitions.insert(key, converted);
    }

    strip_empty_required(&mut schema);
    rewriter.rewrite(&mut schema);

    tracing::debug!(
        slug = %entity.slug,
        field_definitions = field_definitions.len(),
        "converted entity schema"
    );

    Ok(EntitySchema {
        schema: with_description(schema, naming::description(entity)),
        field_definitions,
    })
}

/// Places `description` first; a description already on `schema` wins.
fn with_description(schema: Value, description: Option<String>) -> Value {
    let (description, rest) = match (description, schema) {
        (Some(description), Value::Object(rest)) => (description, rest),
        (_, schema) => return schema,
    };
    let mut out = Map::with_capacity(rest.len() + 1);
    out.insert("description".to_string(), json!(description));
    out.extend(rest);
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{FieldDefinition, FieldType};
    use crate::error::AppError;
    use pretty_assertions::assert_eq;

    struct FailingBuilder;

    impl SchemaBuilder for FailingBuilder {
        fn build(
            &self,
            _config: &HostConfig,
            _entity: &EntityDefinition,
            _format: DescriptionFormat,
        ) -> AppResult<DraftSchema> {
            Err(AppError::SchemaBuilder("boom".into()))
        }
    }

    #[test]
    fn test_description_render() {
        assert_eq!(DescriptionFormat::Text.render("a **b** `c`"), "a b c");
        assert_eq!(DescriptionFormat::Markdown.render("a **b**"), "a **b**");
    }

    #[test]
    fn test_description_render_keeps_lone_markers() {
        let text = DescriptionFormat::Text;
        assert_eq!(text.render("2 * 3"), "2 * 3");
        assert_eq!(text.render("2 * 3 * 4"), "2 * 3 * 4");
        assert_eq!(text.render("*unit* price, 2 * 3"), "unit price, 2 * 3");
        assert_eq!(text.render("a ** b"), "a ** b");
        assert_eq!(text.render("use `id` or ` `"), "use id or ` `");
    }

    #[test]
    fn test_with_description_order_and_precedence() {
        let schema = with_description(json!({ "type": "object" }), Some("Orders".into()));
        let keys: Vec<&String> = schema.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["description", "type"]);

        let schema = with_description(json!({ "description": "own" }), Some("Orders".into()));
        assert_eq!(schema["description"], "own");

        let schema = with_description(json!({ "type": "object" }), None);
        assert!(schema.get("description").is_none());
    }

    #[tokio::test]
    async fn test_entity_to_schema_pipeline() {
        let orders = EntityDefinition::collection("orders")
            .with_description("Customer orders")
            .with_field(
                FieldDefinition::new("customer", FieldType::Relationship)
                    .relation_to("customers")
                    .required(),
            )
            .with_field(
                FieldDefinition::new("shipping", FieldType::Group)
                    .interface_name("ShippingInfo")
                    .with_field(FieldDefinition::new("street", FieldType::Text))
                    .with_field(FieldDefinition::new("internal", FieldType::Text).hidden()),
            )
            .with_field(FieldDefinition::new("secret", FieldType::Text).hidden());
        let config = HostConfig::new(
            vec![orders.clone(), EntityDefinition::collection("customers")],
            vec![],
        );

        let result = entity_to_schema(&config, &orders, &DraftSchemaBuilder, &JsonSchemaConverter)
            .await
            .unwrap();

        assert_eq!(result.schema["description"], "Customer orders");
        assert!(result.schema["properties"].get("secret").is_none());
        assert_eq!(
            result.schema["properties"]["customer"]["oneOf"][1]["$ref"],
            "#/components/schemas/Customer"
        );
        assert_eq!(
            result.schema["properties"]["shipping"]["$ref"],
            "#/components/schemas/ShippingInfo"
        );

        let shipping = &result.field_definitions["ShippingInfo"];
        assert_eq!(
            shipping,
            &json!({
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "street": { "type": "string", "nullable": true }
                }
            })
        );
    }

    #[tokio::test]
    async fn test_builder_errors_propagate() {
        let entity = EntityDefinition::collection("orders");
        let err = entity_to_schema(
            &HostConfig::default(),
            &entity,
            &FailingBuilder,
            &JsonSchemaConverter,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::SchemaBuilder(ref m) if m == "boom"));
    }
}
