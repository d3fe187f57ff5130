//! Update Patient Handler

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

use gabinet_app::domain::patients::data::PatientProfileUpdate;

use crate::{
    extensions::*,
    patients::{errors::into_status_error, get::PatientResponse, parse_date_of_birth},
    state::State,
};

/// Patient profile changes. The email cannot be changed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdatePatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,

    /// `YYYY-MM-DD`
    pub date_of_birth: Option<String>,
}

impl UpdatePatientRequest {
    pub(crate) fn into_update(self) -> Result<PatientProfileUpdate, StatusError> {
        Ok(PatientProfileUpdate {
            date_of_birth: parse_date_of_birth(self.date_of_birth.as_deref())?,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
        })
    }
}

/// Update Patient Handler
#[endpoint(
    tags("patients"),
    summary = "Update Patient",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Patient updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Patient not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "patients.update",
    skip(patient, json, depot),
    fields(tenant_uuid = tracing::field::Empty, patient_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    patient: PathParam<Uuid>,
    json: JsonBody<UpdatePatientRequest>,
    depot: &mut Depot,
) -> Result<Json<PatientResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let patient = patient.into_inner();

    let span = tracing::Span::current();

    span.record("tenant_uuid", tracing::field::display(tenant));
    span.record("patient_uuid", tracing::field::display(patient));

    let update = json.into_inner().into_update()?;

    let patient = state
        .app
        .patients
        .update_profile(tenant, patient.into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(patient.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use gabinet_app::domain::patients::{
        PatientsServiceError,
        records::{PatientRecord, PatientUuid},
    };

    use crate::test_helpers::{Mocks, TEST_TENANT_UUID, make_patient, tenant_service};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        tenant_service(mocks, Router::with_path("patients/{patient}").put(handler))
    }

    #[tokio::test]
    async fn test_update_patient_success() -> TestResult {
        let uuid = PatientUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .patients
            .expect_update_profile()
            .once()
            .withf(move |tenant, patient, update| {
                *tenant == TEST_TENANT_UUID
                    && *patient == uuid
                    && update.last_name == "Kowalska"
                    && update.date_of_birth.is_none()
            })
            .return_once(move |_, _, update| {
                Ok(PatientRecord {
                    last_name: update.last_name,
                    ..make_patient(uuid)
                })
            });

        let mut res = TestClient::put(format!("http://example.com/patients/{uuid}"))
            .json(&json!({ "first_name": "Anna", "last_name": "Kowalska" }))
            .send(&make_service(mocks))
            .await;

        let body: PatientResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.last_name, "Kowalska");
        assert_eq!(body.email, "anna@example.com");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_patient_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .patients
            .expect_update_profile()
            .once()
            .return_once(|_, _, _| Err(PatientsServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/patients/{}", Uuid::now_v7()))
            .json(&json!({ "first_name": "Anna", "last_name": "Nowak" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
