#![deny(missing_docs)]

//! # Route Builder
//!
//! Emits OpenAPI `paths` and `components` for one entity.
//!
//! - **collection**: `/{slug}`, `/{slug}/{id}` and `/{slug}/count`.
//! - **global**: `/globals/{slug}`.
//!
//! Operations whose action is disabled are omitted entirely, and so are the
//! components only those operations reference.

pub mod collection;
pub mod global;

use crate::access::{AccessResolver, Action, DefaultAccessResolver, SecurityPolicy};
use crate::converter::{DraftSchemaBuilder, JsonSchemaConverter, SchemaBuilder, SchemaConverter};
use crate::entity::EntityDefinition;
use crate::error::AppResult;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt;
use std::sync::Arc;

pub use collection::collection_routes;
pub use global::global_routes;

/// `components` of a fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    /// Named schemas.
    pub schemas: Map<String, Value>,
    /// Named request bodies.
    pub request_bodies: Map<String, Value>,
    /// Named responses.
    pub responses: Map<String, Value>,
}

/// Paths and components contributed by one entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OpenApiFragment {
    /// Route template -> HTTP method -> Operation Object.
    pub paths: Map<String, Value>,
    /// Component definitions referenced by `paths`.
    pub components: Components,
}

/// Services and policy used while building routes.
#[derive(Clone)]
pub struct RouteOptions {
    /// Global access policy handed to the resolver.
    pub access: SecurityPolicy,
    /// Produces per-operation `security` arrays.
    pub resolver: Arc<dyn AccessResolver>,
    /// Host JSON Schema generator.
    pub builder: Arc<dyn SchemaBuilder>,
    /// Draft → OpenAPI schema converter.
    pub converter: Arc<dyn SchemaConverter>,
}

impl RouteOptions {
    /// Options backed by the built-in resolver, builder and converter.
    pub fn new(access: SecurityPolicy) -> Self {
        Self {
            access,
            resolver: Arc::new(DefaultAccessResolver),
            builder: Arc::new(DraftSchemaBuilder),
            converter: Arc::new(JsonSchemaConverter),
        }
    }

    /// Replaces the access resolver.
    pub fn with_resolver(mut self, resolver: impl AccessResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Replaces the schema builder.
    pub fn with_builder(mut self, builder: impl SchemaBuilder + 'static) -> Self {
        self.builder = Arc::new(builder);
        self
    }

    /// Replaces the schema converter.
    pub fn with_converter(mut self, converter: impl SchemaConverter + 'static) -> Self {
        self.converter = Arc::new(converter);
        self
    }
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self::new(SecurityPolicy::default())
    }
}

impl fmt::Debug for RouteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteOptions")
            .field("access", &self.access)
            .finish_non_exhaustive()
    }
}

/// Everything an operation needs besides its security.
pub(crate) struct OperationSpec {
    pub(crate) summary: String,
    pub(crate) parameters: Vec<Value>,
    pub(crate) request_body: Option<Value>,
    pub(crate) responses: Value,
}

/// Resolves the operation's security and assembles the Operation Object.
pub(crate) async fn build_operation(
    entity: &EntityDefinition,
    action: Action,
    options: &RouteOptions,
    spec: OperationSpec,
) -> AppResult<Value> {
    let security = options
        .resolver
        .resolve(entity, action, &options.access)
        .await?;

    let mut op = Map::new();
    op.insert("summary".to_string(), json!(spec.summary));
    op.insert("description".to_string(), json!(spec.summary));
    op.insert("tags".to_string(), json!([entity.slug]));
    op.insert("security".to_string(), security);
    op.insert("parameters".to_string(), Value::Array(spec.parameters));
    if let Some(body) = spec.request_body {
        op.insert("requestBody".to_string(), body);
    }
    op.insert("responses".to_string(), spec.responses);

    tracing::trace!(slug = %entity.slug, %action, "built operation");
    Ok(Value::Object(op))
}

/// Primary schema with `custom.openapi.example(s)` laid over it.
pub(crate) fn with_examples(schema: Value, entity: &EntityDefinition) -> Value {
    let mut schema = schema;
    let (example, examples) = entity.openapi_examples();
    if let Some(map) = schema.as_object_mut() {
        if let Some(example) = example {
            map.insert("example".to_string(), example.clone());
        }
        if let Some(examples) = examples {
            map.insert("examples".to_string(), examples.clone());
        }
    }
    schema
}
