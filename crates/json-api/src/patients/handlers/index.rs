//! Patient Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*, patients::errors::into_status_error, patients::get::PatientResponse,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PatientsResponse {
    /// Patients ordered by name
    pub patients: Vec<PatientResponse>,
}

/// Patient Index Handler
#[endpoint(
    tags("patients"),
    summary = "List Patients",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<PatientsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let patients = state
        .app
        .patients
        .list_patients(tenant)
        .await
        .map_err(into_status_error)?;

    Ok(Json(PatientsResponse {
        patients: patients.into_iter().map(Into::into).collect(),
    }))
}
