//! Update Own Profile Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    extensions::*,
    patients::{get::PatientResponse, update::UpdatePatientRequest},
    portal::errors::into_status_error,
    state::State,
};

/// Update Own Profile Handler
///
/// Patients may change their name, phone and date of birth. The email stays fixed.
#[endpoint(
    tags("portal"),
    summary = "Update Own Profile",
    security(("portal_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Profile updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<UpdatePatientRequest>,
    depot: &mut Depot,
) -> Result<Json<PatientResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.portal_principal_or_401()?;
    let update = json.into_inner().into_update()?;

    let patient = state
        .app
        .portal
        .update_me(principal, update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(patient.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use gabinet_app::domain::patients::records::PatientRecord;

    use crate::test_helpers::{
        Mocks, TEST_PATIENT_UUID, TEST_PRINCIPAL, make_patient, portal_service,
    };

    use super::*;

    #[tokio::test]
    async fn test_update_me_keeps_email() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .portal
            .expect_update_me()
            .once()
            .withf(|principal, update| {
                *principal == TEST_PRINCIPAL
                    && update.phone.as_deref() == Some("+48 600 100 200")
                    && update.date_of_birth == Some(jiff::civil::date(1985, 3, 14))
            })
            .return_once(|_, update| {
                Ok(PatientRecord {
                    phone: update.phone,
                    date_of_birth: update.date_of_birth,
                    ..make_patient(TEST_PATIENT_UUID)
                })
            });

        let mut res = TestClient::put("http://example.com/portal/me")
            .json(&json!({
                "first_name": "Anna",
                "last_name": "Nowak",
                "phone": "+48 600 100 200",
                "date_of_birth": "1985-03-14",
                "email": "someone-else@example.com",
            }))
            .send(&portal_service(mocks, Router::with_path("portal/me").put(handler)))
            .await;

        let body: PatientResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.email, "anna@example.com");
        assert_eq!(body.date_of_birth.as_deref(), Some("1985-03-14"));

        Ok(())
    }
}
