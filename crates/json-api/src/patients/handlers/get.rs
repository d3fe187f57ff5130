//! Get Patient Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gabinet_app::domain::patients::records::PatientRecord;

use crate::{extensions::*, patients::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PatientResponse {
    pub uuid: Uuid,
    pub first_name: String,
    pub last_name: String,

    /// Portal sign-in address
    pub email: String,
    pub phone: Option<String>,

    /// `YYYY-MM-DD`
    pub date_of_birth: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PatientRecord> for PatientResponse {
    fn from(patient: PatientRecord) -> Self {
        PatientResponse {
            uuid: patient.uuid.into(),
            first_name: patient.first_name,
            last_name: patient.last_name,
            email: patient.email,
            phone: patient.phone,
            date_of_birth: patient.date_of_birth.map(|date| date.to_string()),
            created_at: patient.created_at.to_string(),
            updated_at: patient.updated_at.to_string(),
        }
    }
}

/// Get Patient Handler
#[endpoint(
    tags("patients"),
    summary = "Get Patient",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Patient found"),
        (status_code = StatusCode::NOT_FOUND, description = "Patient not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    patient: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<PatientResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let patient = state
        .app
        .patients
        .get_patient(tenant, patient.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(patient.into()))
}
