//! Create Patient Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gabinet_app::domain::patients::data::NewPatient;

use crate::{
    extensions::*,
    patients::{errors::into_status_error, get::PatientResponse, parse_date_of_birth},
    state::State,
};

/// Create Patient Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreatePatientRequest {
    pub uuid: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,

    /// `YYYY-MM-DD`
    pub date_of_birth: Option<String>,
}

impl CreatePatientRequest {
    fn into_new_patient(self) -> Result<NewPatient, StatusError> {
        Ok(NewPatient {
            uuid: self.uuid.into(),
            date_of_birth: parse_date_of_birth(self.date_of_birth.as_deref())?,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
        })
    }
}

/// Create Patient Handler
#[endpoint(
    tags("patients"),
    summary = "Create Patient",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Patient created"),
        (status_code = StatusCode::CONFLICT, description = "Email already registered"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreatePatientRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<PatientResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let patient = json.into_inner().into_new_patient()?;

    let patient = state
        .app
        .patients
        .create_patient(tenant, patient)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/patients/{}", patient.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(patient.into()))
}
