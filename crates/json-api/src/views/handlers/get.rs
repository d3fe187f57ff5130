//! Get Saved View Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use gabinet_app::domain::views::records::SavedViewRecord;

use crate::{extensions::*, state::State, views::errors::into_status_error};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ViewResponse {
    pub uuid: Uuid,
    pub entity_type: String,

    /// Stable identifier of a system view
    pub slug: Option<String>,
    pub name: String,

    /// Filters, sort and visible columns
    pub config: Value,

    /// System views are read-only
    pub is_system: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<SavedViewRecord> for ViewResponse {
    type Error = StatusError;

    fn try_from(view: SavedViewRecord) -> Result<Self, Self::Error> {
        Ok(ViewResponse {
            uuid: view.uuid.into(),
            entity_type: view.entity_type.to_string(),
            config: serde_json::to_value(&view.config).or_500("failed to encode view config")?,
            slug: view.slug,
            name: view.name,
            is_system: view.is_system,
            created_at: view.created_at.to_string(),
            updated_at: view.updated_at.to_string(),
        })
    }
}

/// Get Saved View Handler
#[endpoint(
    tags("views"),
    summary = "Get View",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "View found"),
        (status_code = StatusCode::NOT_FOUND, description = "View not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    view: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ViewResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let view = state
        .app
        .views
        .get_view(tenant, view.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(view.try_into()?))
}
