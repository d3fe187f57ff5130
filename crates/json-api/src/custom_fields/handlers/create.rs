//! Create Custom Field Handler

use std::sync::Arc;

use gabinet::fields::{FieldKey, FieldType};
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gabinet_app::domain::custom_fields::{CustomFieldsServiceError, data::NewCustomField};

use crate::{
    custom_fields::{errors::into_status_error, index::CustomFieldResponse, parse_entity_type},
    extensions::*,
    state::State,
};

/// Create Custom Field Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCustomFieldRequest {
    pub uuid: Uuid,
    pub entity_type: String,
    pub key: String,
    pub name: String,
    pub field_type: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
    pub group: Option<String>,
    #[serde(default)]
    pub position: i32,
}

impl CreateCustomFieldRequest {
    fn into_new_field(self) -> Result<NewCustomField, StatusError> {
        let invalid = |error| into_status_error(CustomFieldsServiceError::Field(error));

        Ok(NewCustomField {
            uuid: self.uuid.into(),
            entity_type: parse_entity_type(&self.entity_type)?,
            key: FieldKey::parse(self.key).map_err(invalid)?,
            field_type: self.field_type.parse::<FieldType>().map_err(invalid)?,
            name: self.name,
            options: self.options,
            required: self.required,
            group: self.group,
            position: self.position,
        })
    }
}

/// Create Custom Field Handler
#[endpoint(
    tags("custom-fields"),
    summary = "Create Custom Field",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Custom field created"),
        (status_code = StatusCode::CONFLICT, description = "Key already used for this entity type"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCustomFieldRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CustomFieldResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let field = json.into_inner().into_new_field()?;

    let field = state
        .app
        .custom_fields
        .create_definition(tenant, field)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/custom-fields/{}", field.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(field.into()))
}

#[cfg(test)]
mod tests {
    use gabinet::fields::{EntityType, FieldError};
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use gabinet_app::domain::custom_fields::records::CustomFieldUuid;

    use crate::test_helpers::{Mocks, TEST_TENANT_UUID, tenant_service};

    use super::{super::tests::make_field, *};

    fn make_service(mocks: Mocks) -> Service {
        tenant_service(mocks, Router::with_path("custom-fields").post(handler))
    }

    #[tokio::test]
    async fn test_create_select_field() -> TestResult {
        let uuid = CustomFieldUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .custom_fields
            .expect_create_definition()
            .once()
            .withf(move |tenant, new| {
                *tenant == TEST_TENANT_UUID
                    && new.uuid == uuid
                    && new.entity_type == EntityType::Contact
                    && new.key.as_str() == "source"
                    && new.field_type == FieldType::Select
                    && new.options == ["web", "referral"]
            })
            .return_once(move |_, _| Ok(make_field(uuid, "source")));

        let mut res = TestClient::post("http://example.com/custom-fields")
            .json(&json!({
                "uuid": uuid.into_uuid(),
                "entity_type": "contact",
                "key": "source",
                "name": "Source",
                "field_type": "select",
                "options": ["web", "referral"],
            }))
            .send(&make_service(mocks))
            .await;

        let body: CustomFieldResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/custom-fields/{uuid}").as_str()));
        assert_eq!(body.key, "source");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_rejects_bad_key_before_storage() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.custom_fields.expect_create_definition().never();

        let res = TestClient::post("http://example.com/custom-fields")
            .json(&json!({
                "uuid": Uuid::now_v7(),
                "entity_type": "contact",
                "key": "Lead Source",
                "name": "Source",
                "field_type": "text",
            }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_field_type() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.custom_fields.expect_create_definition().never();

        let res = TestClient::post("http://example.com/custom-fields")
            .json(&json!({
                "uuid": Uuid::now_v7(),
                "entity_type": "contact",
                "key": "source",
                "name": "Source",
                "field_type": "colour",
            }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_select_without_options_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .custom_fields
            .expect_create_definition()
            .once()
            .return_once(|_, _| Err(FieldError::MissingOptions.into()));

        let mut res = TestClient::post("http://example.com/custom-fields")
            .json(&json!({
                "uuid": Uuid::now_v7(),
                "entity_type": "contact",
                "key": "source",
                "name": "Source",
                "field_type": "select",
            }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert!(res.take_string().await?.contains("select fields need at least one option"));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_duplicate_key_returns_409() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .custom_fields
            .expect_create_definition()
            .once()
            .return_once(|_, _| Err(CustomFieldsServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/custom-fields")
            .json(&json!({
                "uuid": Uuid::now_v7(),
                "entity_type": "contact",
                "key": "source",
                "name": "Source",
                "field_type": "text",
            }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
