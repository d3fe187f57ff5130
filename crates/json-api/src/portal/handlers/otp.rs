//! Request Sign-in Code Handler

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

use crate::{extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OtpRequest {
    /// Email the patient is registered under
    pub email: String,
}

/// Request Sign-in Code Handler
///
/// Always accepted, so the response does not reveal whether the email is registered.
#[endpoint(
    tags("portal"),
    summary = "Request Sign-in Code",
    responses(
        (status_code = StatusCode::ACCEPTED, description = "Code sent if the email is registered"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    tenant: PathParam<Uuid>,
    json: JsonBody<OtpRequest>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .portal
        .send_otp(tenant.into_inner().into(), json.into_inner().email.trim())
        .await
        .or_500("failed to issue sign-in code")?;

    Ok(StatusCode::ACCEPTED)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_TENANT_UUID, public_service};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        public_service(mocks, Router::with_path("portal/{tenant}/otp").post(handler))
    }

    #[tokio::test]
    async fn test_request_code_is_accepted() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .portal
            .expect_send_otp()
            .once()
            .withf(|tenant, email| *tenant == TEST_TENANT_UUID && email == "anna@example.com")
            .return_once(|_, _| Ok(()));

        let res = TestClient::post(format!("http://example.com/portal/{TEST_TENANT_UUID}/otp"))
            .json(&json!({ "email": " anna@example.com " }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::ACCEPTED));

        Ok(())
    }

    #[tokio::test]
    async fn test_storage_failure_returns_500() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .portal
            .expect_send_otp()
            .once()
            .return_once(|_, _| Err(sqlx::Error::PoolTimedOut.into()));

        let res = TestClient::post(format!("http://example.com/portal/{TEST_TENANT_UUID}/otp"))
            .json(&json!({ "email": "anna@example.com" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
