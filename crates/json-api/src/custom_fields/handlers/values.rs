//! Set Custom Field Values Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use gabinet_app::domain::custom_fields::data::CustomFieldValue;

use crate::{
    custom_fields::{errors::into_status_error, parse_entity_type},
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct FieldValueRequest {
    /// Custom field UUID
    pub field: Uuid,

    /// New value. `null` clears it.
    pub value: Value,
}

/// Set Custom Field Values Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SetValuesRequest {
    pub entity_type: String,
    pub entity_uuid: Uuid,
    pub values: Vec<FieldValueRequest>,
}

/// Set Custom Field Values Handler
///
/// Writes every value for one entity in a single transaction. Nothing is written when any
/// value fails validation.
#[endpoint(
    tags("custom-fields"),
    summary = "Set Custom Field Values",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Values stored"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Custom field not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "custom_fields.values",
    skip(json, depot),
    fields(
        tenant_uuid = tracing::field::Empty,
        entity_uuid = tracing::field::Empty,
        value_count = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<SetValuesRequest>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("tenant_uuid", tracing::field::display(tenant));
    span.record("entity_uuid", tracing::field::display(request.entity_uuid));
    span.record("value_count", request.values.len());

    let entity_type = parse_entity_type(&request.entity_type)?;

    let values = request
        .values
        .into_iter()
        .map(|value| CustomFieldValue {
            field: value.field.into(),
            value: value.value,
        })
        .collect();

    state
        .app
        .custom_fields
        .set_values(tenant, entity_type, request.entity_uuid, values)
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::OK)
}
