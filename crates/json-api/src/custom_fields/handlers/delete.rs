//! Delete Custom Field Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{custom_fields::errors::into_status_error, extensions::*, state::State};

/// Delete Custom Field Handler
///
/// Stored values for the field are removed with it.
#[endpoint(
    tags("custom-fields"),
    summary = "Delete Custom Field",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Custom field deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Custom field not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    field: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    state
        .app
        .custom_fields
        .delete_definition(tenant, field.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use gabinet_app::domain::custom_fields::{CustomFieldsServiceError, records::CustomFieldUuid};

    use crate::test_helpers::{Mocks, TEST_TENANT_UUID, tenant_service};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        tenant_service(mocks, Router::with_path("custom-fields/{field}").delete(handler))
    }

    #[tokio::test]
    async fn test_delete_field_success() -> TestResult {
        let uuid = CustomFieldUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .custom_fields
            .expect_delete_definition()
            .once()
            .withf(move |tenant, field| *tenant == TEST_TENANT_UUID && *field == uuid)
            .return_once(|_, _| Ok(()));

        let res = TestClient::delete(format!("http://example.com/custom-fields/{uuid}"))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_field_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .custom_fields
            .expect_delete_definition()
            .once()
            .return_once(|_, _| Err(CustomFieldsServiceError::NotFound));

        let res = TestClient::delete(format!("http://example.com/custom-fields/{}", Uuid::now_v7()))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
