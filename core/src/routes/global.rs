//! Global (singleton document) routes.

use crate::access::{is_available, Action};
use crate::base::basic_parameters;
use crate::components::{
    create_ref, create_request_body, create_response, create_upsert_confirmation_schema,
    ComponentSection,
};
use crate::converter::entity_to_schema;
use crate::entity::{EntityDefinition, HostConfig};
use crate::error::AppResult;
use crate::naming;
use crate::routes::{
    build_operation, with_examples, Components, OpenApiFragment, OperationSpec, RouteOptions,
};
use serde_json::{json, Map, Value};

/// Builds `/globals/{slug}` with `get` (read) and `post` (update).
pub async fn global_routes(
    entity: &EntityDefinition,
    options: &RouteOptions,
    config: &HostConfig,
) -> AppResult<OpenApiFragment> {
    let label = naming::singular(entity);
    let schema_name = naming::singular_schema_name(entity);
    let upsert_name = format!("{}UpsertConfirmation", schema_name);
    let readable = is_available(entity, Action::Read);
    let writable = is_available(entity, Action::Update);

    let mut item = Map::new();
    if readable {
        let spec = OperationSpec {
            summary: format!("Get the {}", label),
            parameters: basic_parameters(),
            request_body: None,
            responses: json!({
                "200": create_ref(&schema_name, ComponentSection::Responses)
            }),
        };
        item.insert(
            "get".to_string(),
            build_operation(entity, Action::Read, options, spec).await?,
        );
    }
    if writable {
        let spec = OperationSpec {
            summary: format!("Update the {}", label),
            parameters: basic_parameters(),
            request_body: Some(create_ref(&schema_name, ComponentSection::RequestBodies)),
            responses: json!({
                "200": create_ref(&upsert_name, ComponentSection::Responses)
            }),
        };
        item.insert(
            "post".to_string(),
            build_operation(entity, Action::Update, options, spec).await?,
        );
    }

    let mut paths = Map::new();
    paths.insert(format!("/globals/{}", entity.slug), Value::Object(item));

    let converted = entity_to_schema(
        config,
        entity,
        options.builder.as_ref(),
        options.converter.as_ref(),
    )
    .await?;

    let mut components = Components::default();
    components
        .schemas
        .insert(schema_name.clone(), with_examples(converted.schema, entity));
    if writable {
        components.schemas.insert(
            upsert_name.clone(),
            create_upsert_confirmation_schema(&schema_name, &label),
        );
    }
    components.schemas.extend(converted.field_definitions);

    if readable {
        components.responses.insert(
            ComponentSection::Responses.component_name(&schema_name),
            create_response("ok", &schema_name),
        );
    }
    if writable {
        components.request_bodies.insert(
            ComponentSection::RequestBodies.component_name(&schema_name),
            create_request_body(&schema_name),
        );
        components.responses.insert(
            ComponentSection::Responses.component_name(&upsert_name),
            create_response("ok", &upsert_name),
        );
    }

    tracing::debug!(slug = %entity.slug, "built global routes");
    Ok(OpenApiFragment { paths, components })
}
