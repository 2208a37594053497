#![deny(missing_docs)]

//! # Base Configuration
//!
//! Query parameters and shared components reused by every entity fragment.

use crate::components::{create_response, ComponentSection};
use serde_json::{json, Map, Value};

/// Name of the shared not-found schema.
pub const NOT_FOUND_ERROR: &str = "NotFoundError";

/// Name of the shared count response.
pub const COUNT: &str = "count";

/// Parameters accepted by every operation: `depth`, `locale`, `fallback-locale`.
pub fn basic_parameters() -> Vec<Value> {
    vec![
        json!({
            "name": "depth",
            "in": "query",
            "description": "number of levels to automatically populate relationships and uploads",
            "schema": { "type": "integer" }
        }),
        json!({
            "name": "locale",
            "in": "query",
            "description": "retrieves document(s) in a specific locale",
            "schema": { "type": "string" }
        }),
        json!({
            "name": "fallback-locale",
            "in": "query",
            "description": "specifies a fallback locale if no locale value exists",
            "schema": { "type": "string" }
        }),
    ]
}

/// Pagination and filter parameters of list/find operations.
pub fn find_parameters() -> Vec<Value> {
    vec![
        json!({
            "name": "sort",
            "in": "query",
            "description": "sort by field",
            "schema": { "type": "string" }
        }),
        json!({
            "name": "where",
            "in": "query",
            "description": "pass a where query to constrain returned documents",
            "style": "deepObject",
            "explode": true,
            "schema": { "type": "object", "additionalProperties": true }
        }),
        json!({
            "name": "limit",
            "in": "query",
            "description": "limit the returned documents to a certain number",
            "schema": { "type": "integer" }
        }),
        json!({
            "name": "page",
            "in": "query",
            "description": "get a specific page of documents",
            "schema": { "type": "integer" }
        }),
    ]
}

/// Required string `id` path parameter of item-level operations.
pub fn id_parameter(singular: &str) -> Value {
    json!({
        "name": "id",
        "in": "path",
        "description": format!("id of the {}", singular),
        "required": true,
        "schema": { "type": "string" }
    })
}

/// Shared components referenced by every fragment (not-found error, count).
pub fn base_components() -> Map<String, Value> {
    let mut schemas = Map::new();
    schemas.insert(
        NOT_FOUND_ERROR.to_string(),
        json!({
            "type": "object",
            "properties": {
                "errors": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": { "message": { "type": "string" } },
                        "required": ["message"]
                    }
                }
            },
            "required": ["errors"]
        }),
    );
    schemas.insert(
        COUNT.to_string(),
        json!({
            "type": "object",
            "properties": { "totalDocs": { "type": "integer" } },
            "required": ["totalDocs"]
        }),
    );

    let mut responses = Map::new();
    responses.insert(
        ComponentSection::Responses.component_name(NOT_FOUND_ERROR),
        create_response("not found", NOT_FOUND_ERROR),
    );
    responses.insert(
        ComponentSection::Responses.component_name(COUNT),
        create_response("count of matching documents", COUNT),
    );

    let mut components = Map::new();
    components.insert("schemas".to_string(), Value::Object(schemas));
    components.insert("responses".to_string(), Value::Object(responses));
    components
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_parameter_is_required_path_string() {
        let param = id_parameter("Order");
        assert_eq!(param["in"], "path");
        assert_eq!(param["required"], true);
        assert_eq!(param["schema"]["type"], "string");
        assert_eq!(param["description"], "id of the Order");
    }

    #[test]
    fn test_base_components_cover_shared_refs() {
        let components = base_components();
        assert!(components["schemas"].get("NotFoundError").is_some());
        assert!(components["responses"].get("NotFoundErrorResponse").is_some());
        assert!(components["responses"].get("countResponse").is_some());
        assert_eq!(
            components["responses"]["countResponse"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/count"
        );
    }

    #[test]
    fn test_parameter_names() {
        let names: Vec<Value> = basic_parameters()
            .into_iter()
            .chain(find_parameters())
            .map(|p| p["name"].clone())
            .collect();
        assert_eq!(
            names,
            vec![
                json!("depth"),
                json!("locale"),
                json!("fallback-locale"),
                json!("sort"),
                json!("where"),
                json!("limit"),
                json!("page")
            ]
        );
    }
}
