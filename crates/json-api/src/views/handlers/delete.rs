//! Delete Saved View Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State, views::errors::into_status_error};

/// Delete Saved View Handler
#[endpoint(
    tags("views"),
    summary = "Delete View",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "View deleted"),
        (status_code = StatusCode::FORBIDDEN, description = "System views are read-only"),
        (status_code = StatusCode::NOT_FOUND, description = "View not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    view: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    state
        .app
        .views
        .delete_view(tenant, view.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use gabinet_app::domain::views::{ViewsServiceError, records::SavedViewUuid};

    use crate::test_helpers::{Mocks, TEST_TENANT_UUID, tenant_service};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        tenant_service(mocks, Router::with_path("views/{view}").delete(handler))
    }

    #[tokio::test]
    async fn test_delete_view_success() -> TestResult {
        let uuid = SavedViewUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .views
            .expect_delete_view()
            .once()
            .withf(move |tenant, view| *tenant == TEST_TENANT_UUID && *view == uuid)
            .return_once(|_, _| Ok(()));

        let res = TestClient::delete(format!("http://example.com/views/{uuid}"))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_system_view_returns_403() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .views
            .expect_delete_view()
            .once()
            .return_once(|_, _| Err(ViewsServiceError::Immutable));

        let res = TestClient::delete(format!("http://example.com/views/{}", Uuid::now_v7()))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
