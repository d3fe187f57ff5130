//! Get Appointment Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gabinet_app::domain::appointments::records::AppointmentRecord;

use crate::{appointments::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AppointmentResponse {
    pub uuid: Uuid,
    pub patient_uuid: Uuid,
    pub title: String,
    pub starts_at: String,
    pub ends_at: String,

    /// `scheduled`, `completed` or `cancelled`
    pub status: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<AppointmentRecord> for AppointmentResponse {
    fn from(appointment: AppointmentRecord) -> Self {
        AppointmentResponse {
            uuid: appointment.uuid.into(),
            patient_uuid: appointment.patient_uuid.into(),
            title: appointment.title,
            starts_at: appointment.starts_at.to_string(),
            ends_at: appointment.ends_at.to_string(),
            status: appointment.status.to_string(),
            notes: appointment.notes,
            created_at: appointment.created_at.to_string(),
            updated_at: appointment.updated_at.to_string(),
        }
    }
}

/// Appointment list response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AppointmentsResponse {
    /// Earliest first
    pub appointments: Vec<AppointmentResponse>,
}

impl From<Vec<AppointmentRecord>> for AppointmentsResponse {
    fn from(appointments: Vec<AppointmentRecord>) -> Self {
        AppointmentsResponse {
            appointments: appointments.into_iter().map(Into::into).collect(),
        }
    }
}

/// Get Appointment Handler
#[endpoint(
    tags("appointments"),
    summary = "Get Appointment",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Appointment found"),
        (status_code = StatusCode::NOT_FOUND, description = "Appointment not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    appointment: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<AppointmentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let appointment = state
        .app
        .appointments
        .get_appointment(tenant, appointment.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(appointment.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use gabinet_app::domain::appointments::{AppointmentsServiceError, records::AppointmentUuid};

    use crate::test_helpers::{Mocks, TEST_TENANT_UUID, make_appointment, tenant_service};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        tenant_service(mocks, Router::with_path("appointments/{appointment}").get(handler))
    }

    #[tokio::test]
    async fn test_get_appointment_success() -> TestResult {
        let uuid = AppointmentUuid::new();
        let appointment = make_appointment(uuid, "2024-06-03T10:00:00Z".parse()?);
        let mut mocks = Mocks::default();

        mocks
            .appointments
            .expect_get_appointment()
            .once()
            .withf(move |tenant, appointment| *tenant == TEST_TENANT_UUID && *appointment == uuid)
            .return_once(move |_, _| Ok(appointment));

        let mut res = TestClient::get(format!("http://example.com/appointments/{uuid}"))
            .send(&make_service(mocks))
            .await;

        let body: AppointmentResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.starts_at, "2024-06-03T10:00:00Z");
        assert_eq!(body.ends_at, "2024-06-03T10:30:00Z");
        assert_eq!(body.status, "scheduled");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_appointment_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .appointments
            .expect_get_appointment()
            .once()
            .return_once(|_, _| Err(AppointmentsServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/appointments/{}", Uuid::now_v7()))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
