#![deny(missing_docs)]

//! # CMS OpenAPI Core
//!
//! Turns CMS collection and global definitions into OpenAPI 3 fragments:
//! CRUD paths gated by access rules, plus the component schemas, request
//! bodies and responses they reference.

/// Shared error types.
pub mod error;

/// Collection, global and field definitions.
pub mod entity;

/// Action availability and security resolution.
pub mod access;

/// Label and schema name derivation.
pub mod naming;

/// Reference, request body, response and wrapper schema builders.
pub mod components;

/// Shared parameters and components.
pub mod base;

/// Entity → OpenAPI schema conversion.
pub mod converter;

/// Path and component emission per entity.
pub mod routes;

/// Whole-document assembly.
pub mod document;

pub use access::{
    AccessResolver, AccessRule, AccessRules, Action, Availability, DefaultAccessResolver,
    SecurityPolicy,
};
pub use converter::{
    entity_to_schema, DraftSchema, DraftSchemaBuilder, EntitySchema, JsonSchemaConverter,
    SchemaBuilder, SchemaConverter,
};
pub use document::{generate_document, merge_fragment, DocumentInfo};
pub use entity::{EntityDefinition, EntityKind, FieldDefinition, FieldType, HostConfig};
pub use error::{AppError, AppResult};
pub use routes::{collection_routes, global_routes, Components, OpenApiFragment, RouteOptions};
