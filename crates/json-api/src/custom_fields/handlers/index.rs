//! Custom Field Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gabinet_app::domain::custom_fields::records::CustomFieldRecord;

use crate::{
    custom_fields::{errors::into_status_error, parse_entity_type},
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CustomFieldResponse {
    pub uuid: Uuid,
    pub entity_type: String,

    /// Lowercase slug. Rows carry the value under `cf_<key>`.
    pub key: String,
    pub name: String,
    pub field_type: String,

    /// Choices for select and multi-select fields
    pub options: Vec<String>,
    pub required: bool,
    pub group: Option<String>,
    pub position: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CustomFieldRecord> for CustomFieldResponse {
    fn from(field: CustomFieldRecord) -> Self {
        CustomFieldResponse {
            uuid: field.uuid.into(),
            entity_type: field.entity_type.to_string(),
            key: field.key.to_string(),
            name: field.name,
            field_type: field.field_type.to_string(),
            options: field.options,
            required: field.required,
            group: field.group,
            position: field.position,
            created_at: field.created_at.to_string(),
            updated_at: field.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CustomFieldsResponse {
    /// Definitions in display order
    pub fields: Vec<CustomFieldResponse>,
}

/// Custom Field Index Handler
#[endpoint(
    tags("custom-fields"),
    summary = "List Custom Fields",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Definitions for the entity type"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown entity type"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    entity_type: QueryParam<String, true>,
    depot: &mut Depot,
) -> Result<Json<CustomFieldsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let entity_type = parse_entity_type(&entity_type.into_inner())?;

    let fields = state
        .app
        .custom_fields
        .list_definitions(tenant, entity_type)
        .await
        .map_err(into_status_error)?;

    Ok(Json(CustomFieldsResponse {
        fields: fields.into_iter().map(Into::into).collect(),
    }))
}
