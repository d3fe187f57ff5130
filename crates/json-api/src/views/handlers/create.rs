//! Create Saved View Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use gabinet_app::domain::views::data::NewSavedView;

use crate::{
    custom_fields::parse_entity_type,
    extensions::*,
    state::State,
    views::{errors::into_status_error, get::ViewResponse, parse_config},
};

/// Create Saved View Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateViewRequest {
    pub uuid: Uuid,
    pub entity_type: String,
    pub name: String,

    /// Filters, sort and visible columns
    #[serde(default)]
    pub config: Value,
}

impl CreateViewRequest {
    fn into_new_view(self) -> Result<NewSavedView, StatusError> {
        Ok(NewSavedView {
            uuid: self.uuid.into(),
            entity_type: parse_entity_type(&self.entity_type)?,
            name: self.name,
            config: parse_config(self.config)?,
        })
    }
}

/// Create Saved View Handler
#[endpoint(
    tags("views"),
    summary = "Create View",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "View created"),
        (status_code = StatusCode::CONFLICT, description = "View already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateViewRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ViewResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let view = json.into_inner().into_new_view()?;

    let view = state
        .app
        .views
        .create_view(tenant, view)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/views/{}", view.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(view.try_into()?))
}

#[cfg(test)]
mod tests {
    use gabinet::{
        filters::{FilterError, FilterOperator},
        views::ViewError,
    };
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use gabinet_app::domain::views::records::SavedViewUuid;

    use crate::test_helpers::{Mocks, TEST_TENANT_UUID, tenant_service};

    use super::{super::tests::make_view, *};

    fn make_service(mocks: Mocks) -> Service {
        tenant_service(mocks, Router::with_path("views").post(handler))
    }

    #[tokio::test]
    async fn test_create_view_success() -> TestResult {
        let uuid = SavedViewUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .views
            .expect_create_view()
            .once()
            .withf(move |tenant, new| {
                *tenant == TEST_TENANT_UUID
                    && new.uuid == uuid
                    && new.name == "Active"
                    && new.config.filters.conditions.first().map(|c| c.operator)
                        == Some(FilterOperator::Equals)
            })
            .return_once(move |_, _| Ok(make_view(uuid, "Active")));

        let mut res = TestClient::post("http://example.com/views")
            .json(&json!({
                "uuid": uuid.into_uuid(),
                "entity_type": "contact",
                "name": "Active",
                "config": {
                    "filters": {
                        "conditions": [{ "field": "status", "operator": "equals", "value": "active" }],
                        "logic": "and",
                    },
                },
            }))
            .send(&make_service(mocks))
            .await;

        let body: ViewResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/views/{uuid}").as_str()));
        assert!(!body.is_system);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_view_with_unknown_operator_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .views
            .expect_create_view()
            .once()
            .withf(|_, new| {
                new.config.filters.conditions.first().map(|c| c.operator)
                    == Some(FilterOperator::Unknown)
            })
            .return_once(|_, _| {
                Err(ViewError::Filter(FilterError::UnknownOperator { index: 0 }).into())
            });

        let mut res = TestClient::post("http://example.com/views")
            .json(&json!({
                "uuid": Uuid::now_v7(),
                "entity_type": "contact",
                "name": "Fuzzy",
                "config": {
                    "filters": {
                        "conditions": [{ "field": "status", "operator": "sounds_like", "value": "won" }],
                    },
                },
            }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert!(res.take_string().await?.contains("unknown operator"));

        Ok(())
    }
}
