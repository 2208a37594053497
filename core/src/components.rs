#![deny(missing_docs)]

//! # Component Builders
//!
//! Small constructors for the reference, request body, response and wrapper
//! schemas emitted next to each entity schema.

use serde_json::{json, Value};
use std::fmt;

/// The `components` section a reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentSection {
    /// `#/components/schemas`
    Schemas,
    /// `#/components/requestBodies`
    RequestBodies,
    /// `#/components/responses`
    Responses,
}

impl ComponentSection {
    /// Key of the section inside `components`.
    pub fn key(&self) -> &'static str {
        match self {
            ComponentSection::Schemas => "schemas",
            ComponentSection::RequestBodies => "requestBodies",
            ComponentSection::Responses => "responses",
        }
    }

    /// Suffix appended to names registered in this section.
    pub fn suffix(&self) -> &'static str {
        match self {
            ComponentSection::Schemas => "",
            ComponentSection::RequestBodies => "Request",
            ComponentSection::Responses => "Response",
        }
    }

    /// Component name of `name` inside this section.
    pub fn component_name(&self, name: &str) -> String {
        format!("{}{}", name, self.suffix())
    }
}

impl fmt::Display for ComponentSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// `{"$ref": "#/components/<section>/<name><suffix>"}`
pub fn create_ref(name: &str, section: ComponentSection) -> Value {
    json!({ "$ref": format!("#/components/{}/{}", section, section.component_name(name)) })
}

/// JSON request body wrapping the schema `schema_name`.
pub fn create_request_body(schema_name: &str) -> Value {
    json!({
        "content": {
            "application/json": {
                "schema": create_ref(schema_name, ComponentSection::Schemas)
            }
        }
    })
}

/// JSON response wrapping the schema `schema_name`.
pub fn create_response(description: &str, schema_name: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": create_ref(schema_name, ComponentSection::Schemas)
            }
        }
    })
}

/// Paginated list envelope around `schema_name` documents.
pub fn create_paginated_document_schema(schema_name: &str, plural: &str) -> Value {
    json!({
        "type": "object",
        "title": plural,
        "properties": {
            "docs": {
                "type": "array",
                "items": create_ref(schema_name, ComponentSection::Schemas)
            },
            "totalDocs": { "type": "integer" },
            "limit": { "type": "integer" },
            "totalPages": { "type": "integer" },
            "page": { "type": "integer" },
            "pagingCounter": { "type": "integer" },
            "hasPrevPage": { "type": "boolean" },
            "hasNextPage": { "type": "boolean" },
            "prevPage": { "type": "integer", "nullable": true },
            "nextPage": { "type": "integer", "nullable": true }
        },
        "required": [
            "docs",
            "totalDocs",
            "limit",
            "totalPages",
            "page",
            "pagingCounter",
            "hasPrevPage",
            "hasNextPage",
            "prevPage",
            "nextPage"
        ]
    })
}

/// Confirmation returned by create/update/delete.
pub fn create_upsert_confirmation_schema(schema_name: &str, singular: &str) -> Value {
    json!({
        "type": "object",
        "title": format!("{} upsert confirmation", singular),
        "properties": {
            "doc": create_ref(schema_name, ComponentSection::Schemas),
            "message": { "type": "string" }
        },
        "required": ["doc", "message"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ref_suffixes() {
        assert_eq!(
            create_ref("Order", ComponentSection::Schemas),
            json!({ "$ref": "#/components/schemas/Order" })
        );
        assert_eq!(
            create_ref("Order", ComponentSection::RequestBodies),
            json!({ "$ref": "#/components/requestBodies/OrderRequest" })
        );
        assert_eq!(
            create_ref("count", ComponentSection::Responses),
            json!({ "$ref": "#/components/responses/countResponse" })
        );
    }

    #[test]
    fn test_paginated_schema_references_item() {
        let schema = create_paginated_document_schema("Order", "Orders");
        assert_eq!(schema["title"], "Orders");
        assert_eq!(
            schema["properties"]["docs"]["items"]["$ref"],
            "#/components/schemas/Order"
        );
    }

    #[test]
    fn test_upsert_confirmation() {
        let schema = create_upsert_confirmation_schema("Order", "Order");
        assert_eq!(schema["title"], "Order upsert confirmation");
        assert_eq!(schema["required"], json!(["doc", "message"]));
    }
}
