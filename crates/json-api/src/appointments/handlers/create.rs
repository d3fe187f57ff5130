//! Create Appointment Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gabinet_app::domain::appointments::data::NewAppointment;

use crate::{
    appointments::{errors::into_status_error, get::AppointmentResponse},
    extensions::*,
    state::State,
};

/// Create Appointment Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateAppointmentRequest {
    pub uuid: Uuid,
    pub patient_uuid: Uuid,
    pub title: String,

    /// RFC 3339 timestamp
    pub starts_at: String,

    /// RFC 3339 timestamp, after `starts_at`
    pub ends_at: String,
    pub notes: Option<String>,
}

impl CreateAppointmentRequest {
    fn into_new_appointment(self) -> Result<NewAppointment, StatusError> {
        Ok(NewAppointment {
            uuid: self.uuid.into(),
            patient_uuid: self.patient_uuid.into(),
            title: self.title,
            starts_at: self.starts_at.parse::<Timestamp>().or_400("invalid starts_at")?,
            ends_at: self.ends_at.parse::<Timestamp>().or_400("invalid ends_at")?,
            notes: self.notes,
        })
    }
}

/// Create Appointment Handler
#[endpoint(
    tags("appointments"),
    summary = "Create Appointment",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Appointment created"),
        (status_code = StatusCode::CONFLICT, description = "Appointment already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateAppointmentRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<AppointmentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let appointment = json.into_inner().into_new_appointment()?;

    let appointment = state
        .app
        .appointments
        .create_appointment(tenant, appointment)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/appointments/{}", appointment.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(appointment.into()))
}
