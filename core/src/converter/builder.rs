#![deny(missing_docs)]

//! # Draft Schema Builder
//!
//! Built-in stand-in for the host framework's JSON Schema generator.
//!
//! Produces a draft-07 style schema per entity: optional values are encoded as
//! `type: [T, "null"]`, related documents as `#/definitions/<slug>` references,
//! and fields carrying an `interfaceName` are lifted into the field definition
//! map and referenced as `#/definitions/<interfaceName>`.

use crate::converter::{DescriptionFormat, DraftSchema, SchemaBuilder};
use crate::entity::{EntityDefinition, EntityKind, FieldDefinition, FieldType, HostConfig};
use crate::error::AppResult;
use crate::naming;
use indexmap::IndexMap;
use serde_json::{json, Map, Value};

/// Generates draft schemas straight from [`FieldDefinition`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct DraftSchemaBuilder;

impl SchemaBuilder for DraftSchemaBuilder {
    fn build(
        &self,
        _config: &HostConfig,
        entity: &EntityDefinition,
        format: DescriptionFormat,
    ) -> AppResult<DraftSchema> {
        let mut ctx = BuildContext {
            format,
            field_definitions: IndexMap::new(),
        };

        let mut properties = Map::new();
        let mut required = vec![json!("id")];
        properties.insert("id".to_string(), json!({ "type": "string" }));

        let (fields, fields_required) = ctx.fields_to_properties(&entity.flattened_fields);
        properties.extend(fields);
        required.extend(fields_required.into_iter().map(Value::String));

        match entity.kind {
            EntityKind::Collection => {
                properties.insert("updatedAt".to_string(), timestamp(true));
                properties.insert("createdAt".to_string(), timestamp(true));
                required.push(json!("updatedAt"));
                required.push(json!("createdAt"));
            }
            EntityKind::Global => {
                properties.insert("updatedAt".to_string(), timestamp(false));
                properties.insert("createdAt".to_string(), timestamp(false));
            }
        }

        let schema = json!({
            "type": "object",
            "title": naming::singular_schema_name(entity),
            "additionalProperties": false,
            "properties": properties,
            "required": required
        });

        Ok(DraftSchema {
            schema,
            field_definitions: ctx.field_definitions,
        })
    }
}

struct BuildContext {
    format: DescriptionFormat,
    field_definitions: IndexMap<String, Value>,
}

impl BuildContext {
    /// Returns `(properties, required names)` for a field list.
    fn fields_to_properties(
        &mut self,
        fields: &[FieldDefinition],
    ) -> (Map<String, Value>, Vec<String>) {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in fields {
            let schema = self.field_schema(field);
            let schema = match &field.interface_name {
                Some(interface) => {
                    self.field_definitions.insert(interface.clone(), schema);
                    json!({ "$ref": format!("#/definitions/{}", interface) })
                }
                None => schema,
            };
            properties.insert(field.name.clone(), schema);
            if field.required {
                required.push(field.name.clone());
            }
        }
        (properties, required)
    }

    fn object_schema(&mut self, fields: &[FieldDefinition]) -> Value {
        let (properties, required) = self.fields_to_properties(fields);
        json!({
            "type": "object",
            "additionalProperties": false,
            "properties": properties,
            "required": required
        })
    }

    fn field_schema(&mut self, field: &FieldDefinition) -> Value {
        let mut schema = match field.field_type {
            FieldType::Text | FieldType::Textarea | FieldType::Email | FieldType::Code => {
                scalar("string", field)
            }
            FieldType::Number => scalar("number", field),
            FieldType::Checkbox => json!({ "type": nullable_type("boolean", field.required) }),
            FieldType::Date => json!({
                "type": nullable_type("string", field.required),
                "format": "date-time"
            }),
            FieldType::Select | FieldType::Radio => option_schema(field),
            FieldType::Relationship | FieldType::Upload => relationship_schema(field),
            FieldType::Array => {
                let row = self.object_schema(&field.fields);
                json!({
                    "type": nullable_type("array", field.required),
                    "items": row
                })
            }
            FieldType::Group => self.object_schema(&field.fields),
            FieldType::Json => json!({
                "type": ["object", "array", "string", "number", "boolean", "null"]
            }),
            FieldType::Point => json!({
                "type": nullable_type("array", field.required),
                "items": [{ "type": "number" }, { "type": "number" }],
                "minItems": 2,
                "maxItems": 2
            }),
            FieldType::RichText => json!({
                "type": nullable_type("object", field.required),
                "additionalProperties": true
            }),
        };

        if let (Some(desc), Some(map)) = (&field.description, schema.as_object_mut()) {
            map.insert("description".to_string(), json!(self.format.render(desc)));
        }
        schema
    }
}

fn nullable_type(ty: &str, required: bool) -> Value {
    if required {
        json!(ty)
    } else {
        json!([ty, "null"])
    }
}

fn scalar(ty: &str, field: &FieldDefinition) -> Value {
    if field.has_many {
        json!({
            "type": nullable_type("array", field.required),
            "items": { "type": ty }
        })
    } else {
        json!({ "type": nullable_type(ty, field.required) })
    }
}

fn timestamp(required: bool) -> Value {
    json!({ "type": nullable_type("string", required), "format": "date-time" })
}

fn option_schema(field: &FieldDefinition) -> Value {
    let values: Vec<Value> = field.options.iter().map(|o| json!(o.value())).collect();
    if field.has_many {
        return json!({
            "type": nullable_type("array", field.required),
            "items": { "type": "string", "enum": values }
        });
    }
    let mut values = values;
    if !field.required {
        values.push(Value::Null);
    }
    json!({ "type": nullable_type("string", field.required), "enum": values })
}

/// `id | populated document`, or a `{relationTo, value}` union for polymorphic fields.
fn relationship_schema(field: &FieldDefinition) -> Value {
    let single_target = |slug: &str, required: bool| {
        json!({
            "oneOf": [
                { "type": nullable_type("string", required) },
                { "$ref": format!("#/definitions/{}", slug) }
            ]
        })
    };

    let value = match field.relation_to.as_slice() {
        [slug] => single_target(slug.as_str(), field.required || field.has_many),
        targets => {
            let branches: Vec<Value> = targets
                .iter()
                .map(|slug| {
                    json!({
                        "type": "object",
                        "properties": {
                            "relationTo": { "const": slug },
                            "value": single_target(slug.as_str(), true)
                        },
                        "required": ["relationTo", "value"]
                    })
                })
                .collect();
            json!({ "oneOf": branches })
        }
    };

    if field.has_many {
        json!({ "type": nullable_type("array", field.required), "items": value })
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(entity: &EntityDefinition) -> DraftSchema {
        DraftSchemaBuilder
            .build(&HostConfig::default(), entity, DescriptionFormat::Text)
            .unwrap()
    }

    #[test]
    fn test_collection_envelope() {
        let entity = EntityDefinition::collection("products")
            .with_field(FieldDefinition::new("price", FieldType::Number).required());
        let draft = build(&entity);
        assert_eq!(draft.schema["title"], "Product");
        assert_eq!(
            draft.schema["required"],
            json!(["id", "price", "updatedAt", "createdAt"])
        );
        assert_eq!(draft.schema["properties"]["price"]["type"], "number");
        assert!(draft.field_definitions.is_empty());
    }

    #[test]
    fn test_optional_scalars_are_null_unions() {
        let entity = EntityDefinition::collection("posts")
            .with_field(FieldDefinition::new("title", FieldType::Text));
        let draft = build(&entity);
        assert_eq!(
            draft.schema["properties"]["title"]["type"],
            json!(["string", "null"])
        );
    }

    #[test]
    fn test_relationship_points_to_definitions() {
        let entity = EntityDefinition::collection("orders").with_field(
            FieldDefinition::new("customer", FieldType::Relationship)
                .relation_to("customers")
                .required(),
        );
        let draft = build(&entity);
        assert_eq!(
            draft.schema["properties"]["customer"]["oneOf"][1]["$ref"],
            "#/definitions/customers"
        );
    }

    #[test]
    fn test_polymorphic_relationship() {
        let entity = EntityDefinition::collection("links").with_field(
            FieldDefinition::new("target", FieldType::Relationship)
                .relation_to("pages")
                .relation_to("posts"),
        );
        let draft = build(&entity);
        let branches = draft.schema["properties"]["target"]["oneOf"]
            .as_array()
            .unwrap();
        assert_eq!(branches.len(), 2);
        assert_eq!(branches[1]["properties"]["relationTo"]["const"], "posts");
    }

    #[test]
    fn test_interface_name_lifts_field_definition() {
        let entity = EntityDefinition::collection("pages").with_field(
            FieldDefinition::new("seo", FieldType::Group)
                .interface_name("SeoFields")
                .with_field(FieldDefinition::new("title", FieldType::Text)),
        );
        let draft = build(&entity);
        assert_eq!(
            draft.schema["properties"]["seo"],
            json!({ "$ref": "#/definitions/SeoFields" })
        );
        let seo = &draft.field_definitions["SeoFields"];
        assert_eq!(seo["type"], "object");
        assert_eq!(seo["required"], json!([]));
    }

    #[test]
    fn test_optional_select_allows_null() {
        let entity = EntityDefinition::collection("posts").with_field(
            FieldDefinition::new("status", FieldType::Select)
                .option("draft")
                .option("published"),
        );
        let draft = build(&entity);
        assert_eq!(
            draft.schema["properties"]["status"]["enum"],
            json!(["draft", "published", null])
        );
    }

    #[test]
    fn test_field_description_rendered_as_text() {
        let mut field = FieldDefinition::new("body", FieldType::Textarea);
        field.description = Some("The **main** body".into());
        let entity = EntityDefinition::collection("posts").with_field(field);
        let draft = build(&entity);
        assert_eq!(
            draft.schema["properties"]["body"]["description"],
            "The main body"
        );
    }
}
