//! Saved View Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    custom_fields::parse_entity_type,
    extensions::*,
    state::State,
    views::{errors::into_status_error, get::ViewResponse},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ViewsResponse {
    /// System views first, then by name
    pub views: Vec<ViewResponse>,
}

/// Saved View Index Handler
#[endpoint(
    tags("views"),
    summary = "List Views",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Views for the entity type"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown entity type"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    entity_type: QueryParam<String, true>,
    depot: &mut Depot,
) -> Result<Json<ViewsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let entity_type = parse_entity_type(&entity_type.into_inner())?;

    let views = state
        .app
        .views
        .list_views(tenant, entity_type)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ViewsResponse {
        views: views
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<_, _>>()?,
    }))
}
