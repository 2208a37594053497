//! Collection CRUD routes.

use crate::access::{Action, Availability, Gate};
use crate::base::{basic_parameters, find_parameters, id_parameter, COUNT, NOT_FOUND_ERROR};
use crate::components::{
    create_paginated_document_schema, create_ref, create_request_body, create_response,
    create_upsert_confirmation_schema, ComponentSection,
};
use crate::converter::entity_to_schema;
use crate::entity::{EntityDefinition, HostConfig};
use crate::error::AppResult;
use crate::naming;
use crate::routes::{
    build_operation, with_examples, Components, OpenApiFragment, OperationSpec, RouteOptions,
};
use serde_json::{json, Map, Value};

/// Builds the paths and components of a collection.
///
/// Operations are resolved one after another in route order; the first
/// failing resolution or conversion aborts the whole fragment.
pub async fn collection_routes(
    entity: &EntityDefinition,
    options: &RouteOptions,
    config: &HostConfig,
) -> AppResult<OpenApiFragment> {
    let availability = Availability::of(entity);
    let single_item = naming::singular(entity);
    let plural = naming::plural(entity);
    let schema_name = naming::singular_schema_name(entity);
    let plural_schema_name = naming::plural_schema_name(entity);
    let upsert_name = format!("{}UpsertConfirmation", schema_name);

    let not_found = create_ref(NOT_FOUND_ERROR, ComponentSection::Responses);
    let item_params = |extra: Vec<Value>| {
        let mut params = vec![id_parameter(&single_item)];
        params.extend(basic_parameters());
        params.extend(extra);
        params
    };

    let mut root = Map::new();
    if availability.allows(Action::Read) {
        let spec = OperationSpec {
            summary: format!("Find paginated {}", plural),
            parameters: basic_parameters().into_iter().chain(find_parameters()).collect(),
            request_body: None,
            responses: json!({
                "200": create_ref(&plural_schema_name, ComponentSection::Responses)
            }),
        };
        root.insert(
            "get".to_string(),
            build_operation(entity, Action::Read, options, spec).await?,
        );
    }
    if availability.allows(Action::Create) {
        let spec = OperationSpec {
            summary: format!("Create a new {}", single_item),
            parameters: basic_parameters(),
            request_body: Some(create_ref(&schema_name, ComponentSection::RequestBodies)),
            responses: json!({
                "200": create_ref(&upsert_name, ComponentSection::Responses)
            }),
        };
        root.insert(
            "post".to_string(),
            build_operation(entity, Action::Create, options, spec).await?,
        );
    }

    let mut item = Map::new();
    if availability.allows(Action::Read) {
        let spec = OperationSpec {
            summary: format!("Get a single {} by its id", single_item),
            parameters: item_params(find_parameters()),
            request_body: None,
            responses: json!({
                "200": create_ref(&schema_name, ComponentSection::Responses),
                "404": not_found
            }),
        };
        item.insert(
            "get".to_string(),
            build_operation(entity, Action::Read, options, spec).await?,
        );
    }
    if availability.allows(Action::Update) {
        let spec = OperationSpec {
            summary: format!("Updates a {}", single_item),
            parameters: item_params(Vec::new()),
            request_body: Some(create_ref(&schema_name, ComponentSection::RequestBodies)),
            responses: json!({
                "200": create_ref(&upsert_name, ComponentSection::Responses),
                "404": not_found
            }),
        };
        item.insert(
            "patch".to_string(),
            build_operation(entity, Action::Update, options, spec).await?,
        );
    }
    if availability.allows(Action::Delete) {
        let spec = OperationSpec {
            summary: format!("Deletes an existing {}", single_item),
            parameters: item_params(Vec::new()),
            request_body: None,
            responses: json!({
                "200": create_ref(&upsert_name, ComponentSection::Responses),
                "404": not_found
            }),
        };
        item.insert(
            "delete".to_string(),
            build_operation(entity, Action::Delete, options, spec).await?,
        );
    }

    let mut count = Map::new();
    if availability.allows(Action::Read) {
        let spec = OperationSpec {
            summary: format!("Count {}", plural),
            parameters: Vec::new(),
            request_body: None,
            responses: json!({
                "200": create_ref(COUNT, ComponentSection::Responses)
            }),
        };
        count.insert(
            "get".to_string(),
            build_operation(entity, Action::Read, options, spec).await?,
        );
    }

    let mut paths = Map::new();
    paths.insert(format!("/{}", entity.slug), Value::Object(root));
    paths.insert(format!("/{}/{{id}}", entity.slug), Value::Object(item));
    paths.insert(format!("/{}/count", entity.slug), Value::Object(count));

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
    if availability.opens(Gate::List) {
        components.schemas.insert(
            plural_schema_name.clone(),
            create_paginated_document_schema(&schema_name, &plural),
        );
    }
    if availability.opens(Gate::UpsertConfirmation) {
        components.schemas.insert(
            upsert_name.clone(),
            create_upsert_confirmation_schema(&schema_name, &single_item),
        );
    }
    components.schemas.extend(converted.field_definitions);

    if availability.opens(Gate::RequestBody) {
        components.request_bodies.insert(
            ComponentSection::RequestBodies.component_name(&schema_name),
            create_request_body(&schema_name),
        );
    }

    if availability.opens(Gate::List) {
        components.responses.insert(
            ComponentSection::Responses.component_name(&schema_name),
            create_response("ok", &schema_name),
        );
        components.responses.insert(
            ComponentSection::Responses.component_name(&plural_schema_name),
            create_response("ok", &plural_schema_name),
        );
    }
    if availability.opens(Gate::UpsertConfirmation) {
        components.responses.insert(
            ComponentSection::Responses.component_name(&upsert_name),
            create_response("ok", &upsert_name),
        );
    }

    tracing::debug!(
        slug = %entity.slug,
        schemas = components.schemas.len(),
        "built collection routes"
    );

    Ok(OpenApiFragment { paths, components })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessRule;
    use crate::entity::{FieldDefinition, FieldType};
    use pretty_assertions::assert_eq;

    fn keys(value: &Value) -> Vec<String> {
        value
            .as_object()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_full_access_collection() {
        let orders = EntityDefinition::collection("orders")
            .with_field(FieldDefinition::new("total", FieldType::Number).required());
        let config = HostConfig::new(vec![orders.clone()], vec![]);
        let fragment = collection_routes(&orders, &RouteOptions::default(), &config)
            .await
            .unwrap();

        assert_eq!(keys(&fragment.paths["/orders"]), vec!["get", "post"]);
        assert_eq!(
            keys(&fragment.paths["/orders/{id}"]),
            vec!["get", "patch", "delete"]
        );
        assert_eq!(keys(&fragment.paths["/orders/count"]), vec!["get"]);

        let schemas: Vec<&String> = fragment.components.schemas.keys().collect();
        assert_eq!(schemas, vec!["Order", "Orders", "OrderUpsertConfirmation"]);
        let bodies: Vec<&String> = fragment.components.request_bodies.keys().collect();
        assert_eq!(bodies, vec!["OrderRequest"]);
        let responses: Vec<&String> = fragment.components.responses.keys().collect();
        assert_eq!(
            responses,
            vec!["OrderResponse", "OrdersResponse", "OrderUpsertConfirmationResponse"]
        );

        let post = &fragment.paths["/orders"]["post"];
        assert_eq!(
            post["requestBody"],
            json!({ "$ref": "#/components/requestBodies/OrderRequest" })
        );
        assert_eq!(
            post["responses"]["200"],
            json!({ "$ref": "#/components/responses/OrderUpsertConfirmationResponse" })
        );
        assert_eq!(
            fragment.paths["/orders"]["get"]["responses"]["200"],
            json!({ "$ref": "#/components/responses/OrdersResponse" })
        );
    }

    #[tokio::test]
    async fn test_item_routes_have_id_and_not_found() {
        let orders = EntityDefinition::collection("orders");
        let config = HostConfig::new(vec![orders.clone()], vec![]);
        let fragment = collection_routes(&orders, &RouteOptions::default(), &config)
            .await
            .unwrap();

        for method in ["get", "patch", "delete"] {
            let op = &fragment.paths["/orders/{id}"][method];
            assert_eq!(op["parameters"][0]["name"], "id");
            assert_eq!(op["parameters"][0]["required"], true);
            assert_eq!(
                op["responses"]["404"],
                json!({ "$ref": "#/components/responses/NotFoundErrorResponse" })
            );
        }
        // get adds the find parameters on top of id + basic
        assert_eq!(
            fragment.paths["/orders/{id}"]["get"]["parameters"]
                .as_array()
                .map(Vec::len),
            Some(8)
        );
        assert_eq!(
            fragment.paths["/orders/{id}"]["patch"]["parameters"]
                .as_array()
                .map(Vec::len),
            Some(4)
        );
    }

    #[tokio::test]
    async fn test_read_only_collection() {
        let logs = EntityDefinition::collection("logs")
            .with_access(Action::Create, AccessRule::Disabled)
            .with_access(Action::Update, AccessRule::Disabled)
            .with_access(Action::Delete, AccessRule::Disabled);
        let config = HostConfig::new(vec![logs.clone()], vec![]);
        let fragment = collection_routes(&logs, &RouteOptions::default(), &config)
            .await
            .unwrap();

        assert_eq!(keys(&fragment.paths["/logs"]), vec!["get"]);
        assert_eq!(keys(&fragment.paths["/logs/{id}"]), vec!["get"]);
        assert!(fragment.components.request_bodies.is_empty());
        assert!(!fragment.components.schemas.contains_key("LogUpsertConfirmation"));
        assert!(!fragment
            .components
            .responses
            .contains_key("LogUpsertConfirmationResponse"));
    }

    #[tokio::test]
    async fn test_write_only_collection() {
        let inbox = EntityDefinition::collection("submissions")
            .with_access(Action::Read, AccessRule::Disabled);
        let config = HostConfig::new(vec![inbox.clone()], vec![]);
        let fragment = collection_routes(&inbox, &RouteOptions::default(), &config)
            .await
            .unwrap();

        assert_eq!(keys(&fragment.paths["/submissions"]), vec!["post"]);
        assert_eq!(
            keys(&fragment.paths["/submissions/{id}"]),
            vec!["patch", "delete"]
        );
        assert!(keys(&fragment.paths["/submissions/count"]).is_empty());
        assert!(!fragment.components.schemas.contains_key("Submissions"));
        assert!(fragment.components.schemas.contains_key("Submission"));
        assert!(!fragment.components.responses.contains_key("SubmissionsResponse"));
    }
}
