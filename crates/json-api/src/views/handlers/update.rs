//! Update Saved View Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use gabinet_app::domain::views::data::SavedViewUpdate;

use crate::{
    extensions::*,
    state::State,
    views::{errors::into_status_error, get::ViewResponse, parse_config},
};

/// Update Saved View Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateViewRequest {
    pub name: String,

    /// Replaces the stored configuration
    #[serde(default)]
    pub config: Value,
}

/// Update Saved View Handler
#[endpoint(
    tags("views"),
    summary = "Update View",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "View updated"),
        (status_code = StatusCode::FORBIDDEN, description = "System views are read-only"),
        (status_code = StatusCode::NOT_FOUND, description = "View not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    view: PathParam<Uuid>,
    json: JsonBody<UpdateViewRequest>,
    depot: &mut Depot,
) -> Result<Json<ViewResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let request = json.into_inner();

    let update = SavedViewUpdate {
        config: parse_config(request.config)?,
        name: request.name,
    };

    let view = state
        .app
        .views
        .update_view(tenant, view.into_inner().into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(view.try_into()?))
}

#[cfg(test)]
mod tests {
    use gabinet::views::ViewConfig;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use gabinet_app::domain::views::{
        ViewsServiceError,
        records::{SavedViewRecord, SavedViewUuid},
    };

    use crate::test_helpers::{Mocks, TEST_TENANT_UUID, tenant_service};

    use super::{super::tests::make_view, *};

    fn make_service(mocks: Mocks) -> Service {
        tenant_service(mocks, Router::with_path("views/{view}").put(handler))
    }

    #[tokio::test]
    async fn test_update_view_replaces_config() -> TestResult {
        let uuid = SavedViewUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .views
            .expect_update_view()
            .once()
            .withf(move |tenant, view, update| {
                *tenant == TEST_TENANT_UUID
                    && *view == uuid
                    && update.name == "Everyone"
                    && update.config == ViewConfig::default()
            })
            .return_once(move |_, _, update| {
                Ok(SavedViewRecord {
                    name: update.name,
                    config: update.config,
                    ..make_view(uuid, "Active")
                })
            });

        let mut res = TestClient::put(format!("http://example.com/views/{uuid}"))
            .json(&json!({ "name": "Everyone", "config": {} }))
            .send(&make_service(mocks))
            .await;

        let body: ViewResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.name, "Everyone");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_system_view_returns_403() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .views
            .expect_update_view()
            .once()
            .return_once(|_, _, _| Err(ViewsServiceError::Immutable));

        let res = TestClient::put(format!("http://example.com/views/{}", Uuid::now_v7()))
            .json(&json!({ "name": "Renamed", "config": {} }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
