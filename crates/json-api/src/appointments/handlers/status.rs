//! Appointment Status Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gabinet_app::domain::appointments::records::AppointmentStatus;

use crate::{
    appointments::{errors::into_status_error, get::AppointmentResponse},
    extensions::*,
    state::State,
};

/// Appointment Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateStatusRequest {
    /// `scheduled`, `completed` or `cancelled`
    pub status: String,
}

/// Appointment Status Handler
#[endpoint(
    tags("appointments"),
    summary = "Update Appointment Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Status updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Appointment not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    appointment: PathParam<Uuid>,
    json: JsonBody<UpdateStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<AppointmentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let status = json
        .into_inner()
        .status
        .parse::<AppointmentStatus>()
        .or_400("invalid status")?;

    let appointment = state
        .app
        .appointments
        .update_status(tenant, appointment.into_inner().into(), status)
        .await
        .map_err(into_status_error)?;

    Ok(Json(appointment.into()))
}
