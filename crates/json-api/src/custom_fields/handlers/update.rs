//! Update Custom Field Handler

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

use gabinet_app::domain::custom_fields::data::CustomFieldUpdate;

use crate::{
    custom_fields::{errors::into_status_error, index::CustomFieldResponse},
    extensions::*,
    state::State,
};

/// Update Custom Field Request
///
/// The key, entity type and field type cannot change.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCustomFieldRequest {
    pub name: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
    pub group: Option<String>,
    #[serde(default)]
    pub position: i32,
}

impl From<UpdateCustomFieldRequest> for CustomFieldUpdate {
    fn from(request: UpdateCustomFieldRequest) -> Self {
        CustomFieldUpdate {
            name: request.name,
            options: request.options,
            required: request.required,
            group: request.group,
            position: request.position,
        }
    }
}

/// Update Custom Field Handler
#[endpoint(
    tags("custom-fields"),
    summary = "Update Custom Field",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Custom field updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Custom field not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    field: PathParam<Uuid>,
    json: JsonBody<UpdateCustomFieldRequest>,
    depot: &mut Depot,
) -> Result<Json<CustomFieldResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let field = state
        .app
        .custom_fields
        .update_definition(tenant, field.into_inner().into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(field.into()))
}

#[cfg(test)]
mod tests {
    use gabinet::fields::FieldError;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use gabinet_app::domain::custom_fields::{
        CustomFieldsServiceError,
        records::{CustomFieldRecord, CustomFieldUuid},
    };

    use crate::test_helpers::{Mocks, TEST_TENANT_UUID, tenant_service};

    use super::{super::tests::make_field, *};

    fn make_service(mocks: Mocks) -> Service {
        tenant_service(mocks, Router::with_path("custom-fields/{field}").put(handler))
    }

    #[tokio::test]
    async fn test_update_renames_field() -> TestResult {
        let uuid = CustomFieldUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .custom_fields
            .expect_update_definition()
            .once()
            .withf(move |tenant, field, update| {
                *tenant == TEST_TENANT_UUID
                    && *field == uuid
                    && *update
                        == CustomFieldUpdate {
                            name: "Lead source".to_string(),
                            options: vec!["web".to_string()],
                            required: true,
                            group: Some("Marketing".to_string()),
                            position: 2,
                        }
            })
            .return_once(move |_, _, update| {
                Ok(CustomFieldRecord {
                    name: update.name,
                    ..make_field(uuid, "source")
                })
            });

        let mut res = TestClient::put(format!("http://example.com/custom-fields/{uuid}"))
            .json(&json!({
                "name": "Lead source",
                "options": ["web"],
                "required": true,
                "group": "Marketing",
                "position": 2,
            }))
            .send(&make_service(mocks))
            .await;

        let body: CustomFieldResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.name, "Lead source");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_field_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .custom_fields
            .expect_update_definition()
            .once()
            .return_once(|_, _, _| Err(CustomFieldsServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/custom-fields/{}", Uuid::now_v7()))
            .json(&json!({ "name": "Source" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_with_duplicate_options_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .custom_fields
            .expect_update_definition()
            .once()
            .return_once(|_, _, _| Err(FieldError::DuplicateOption("web".to_string()).into()));

        let res = TestClient::put(format!("http://example.com/custom-fields/{}", Uuid::now_v7()))
            .json(&json!({ "name": "Source", "options": ["web", "web"] }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
