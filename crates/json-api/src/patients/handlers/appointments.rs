//! Patient Appointments Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    appointments::{errors::into_status_error, get::AppointmentsResponse},
    extensions::*,
    state::State,
};

/// Patient Appointments Handler
///
/// Returns a patient's appointments, earliest first.
#[endpoint(
    tags("patients"),
    summary = "List Patient Appointments",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    patient: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<AppointmentsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let appointments = state
        .app
        .appointments
        .list_for_patient(tenant, patient.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(appointments.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use gabinet_app::domain::appointments::records::AppointmentUuid;

    use crate::test_helpers::{
        Mocks, TEST_PATIENT_UUID, TEST_TENANT_UUID, make_appointment, tenant_service,
    };

    use super::*;

    #[tokio::test]
    async fn test_lists_patient_appointments() -> TestResult {
        let first = make_appointment(AppointmentUuid::new(), "2024-06-03T10:00:00Z".parse()?);
        let second = make_appointment(AppointmentUuid::new(), "2024-06-10T10:00:00Z".parse()?);
        let mut mocks = Mocks::default();

        mocks
            .appointments
            .expect_list_for_patient()
            .once()
            .withf(|tenant, patient| *tenant == TEST_TENANT_UUID && *patient == TEST_PATIENT_UUID)
            .return_once(move |_, _| Ok(vec![first, second]));

        let service = tenant_service(
            mocks,
            Router::with_path("patients/{patient}/appointments").get(handler),
        );

        let mut res = TestClient::get(format!(
            "http://example.com/patients/{TEST_PATIENT_UUID}/appointments"
        ))
        .send(&service)
        .await;

        let body: AppointmentsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(
            body.appointments
                .iter()
                .map(|a| a.starts_at.as_str())
                .collect::<Vec<_>>(),
            vec!["2024-06-03T10:00:00Z", "2024-06-10T10:00:00Z"]
        );

        Ok(())
    }
}
