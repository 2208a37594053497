#![deny(missing_docs)]

//! # Document Assembly
//!
//! Merges the fragments of every collection and global, plus the shared base
//! components, into a single OpenAPI 3.0 document.

use crate::base::base_components;
use crate::entity::HostConfig;
use crate::error::AppResult;
use crate::routes::{collection_routes, global_routes, OpenApiFragment, RouteOptions};
use serde_json::{json, Map, Value};

/// OpenAPI version emitted by [`generate_document`].
pub const OPENAPI_VERSION: &str = "3.0.3";

/// `info` metadata of the generated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    /// The title of the API.
    pub title: String,
    /// The version of the API document.
    pub version: String,
    /// Optional description for the API.
    pub description: Option<String>,
}

impl DocumentInfo {
    /// Creates a new DocumentInfo with required fields.
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            description: None,
        }
    }

    /// Sets an optional description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Generates the whole document: collections first, then globals.
///
/// Entities are processed one at a time and the first error aborts the run.
pub async fn generate_document(
    config: &HostConfig,
    options: &RouteOptions,
    info: &DocumentInfo,
) -> AppResult<Value> {
    let mut paths = Map::new();
    let mut components = base_components();

    for collection in &config.collections {
        let fragment = collection_routes(collection, options, config).await?;
        merge_fragment(&mut paths, &mut components, fragment);
    }
    for global in &config.globals {
        let fragment = global_routes(global, options, config).await?;
        merge_fragment(&mut paths, &mut components, fragment);
    }

    let mut scheme = Map::new();
    scheme.insert(
        options.access.scheme.clone(),
        json!({ "type": "http", "scheme": "bearer", "bearerFormat": "JWT" }),
    );
    components.insert("securitySchemes".to_string(), Value::Object(scheme));

    let mut info_obj = Map::new();
    info_obj.insert("title".to_string(), json!(info.title));
    info_obj.insert("version".to_string(), json!(info.version));
    if let Some(desc) = &info.description {
        info_obj.insert("description".to_string(), json!(desc));
    }

    let mut doc = Map::new();
    doc.insert("openapi".to_string(), json!(OPENAPI_VERSION));
    doc.insert("info".to_string(), Value::Object(info_obj));
    doc.insert("paths".to_string(), Value::Object(paths));
    doc.insert("components".to_string(), Value::Object(components));

    tracing::info!(
        collections = config.collections.len(),
        globals = config.globals.len(),
        "generated OpenAPI document"
    );
    Ok(Value::Object(doc))
}

/// Merges `fragment` into `paths` and `components`, key by key.
///
/// Later fragments win on key collisions.
pub fn merge_fragment(
    paths: &mut Map<String, Value>,
    components: &mut Map<String, Value>,
    fragment: OpenApiFragment,
) {
    paths.extend(fragment.paths);
    let sections = [
        ("schemas", fragment.components.schemas),
        ("requestBodies", fragment.components.request_bodies),
        ("responses", fragment.components.responses),
    ];
    for (key, entries) in sections {
        if entries.is_empty() {
            continue;
        }
        let section = components
            .entry(key)
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(section) = section.as_object_mut() {
            section.extend(entries);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::Components;

    #[test]
    fn test_merge_fragment_skips_empty_sections() {
        let mut paths = Map::new();
        let mut components = Map::new();
        let mut fragment = OpenApiFragment::default();
        fragment.paths.insert("/a".into(), json!({}));
        fragment.components = Components {
            schemas: [("A".to_string(), json!({}))].into_iter().collect(),
            ..Components::default()
        };
        merge_fragment(&mut paths, &mut components, fragment);
        assert!(paths.contains_key("/a"));
        assert!(components["schemas"].get("A").is_some());
        assert!(!components.contains_key("requestBodies"));
    }

    #[test]
    fn test_document_info_builder() {
        let info = DocumentInfo::new("Shop", "1.0.0").with_description("Shop API");
        assert_eq!(info.description.as_deref(), Some("Shop API"));
    }
}
