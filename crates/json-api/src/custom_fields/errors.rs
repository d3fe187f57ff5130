//! Custom Field Errors

use salvo::http::StatusError;
use tracing::error;

use gabinet_app::domain::custom_fields::CustomFieldsServiceError;

pub(crate) fn into_status_error(error: CustomFieldsServiceError) -> StatusError {
    match error {
        CustomFieldsServiceError::AlreadyExists => {
            StatusError::conflict().brief("A field with this key already exists")
        }
        CustomFieldsServiceError::NotFound => {
            StatusError::not_found().brief("Custom field not found")
        }
        CustomFieldsServiceError::InvalidReference => {
            StatusError::bad_request().brief("Unknown custom field")
        }
        CustomFieldsServiceError::MissingRequiredData
        | CustomFieldsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid custom field payload")
        }
        CustomFieldsServiceError::Field(source) => {
            StatusError::bad_request().brief(source.to_string())
        }
        CustomFieldsServiceError::Sql(source) => {
            error!("custom field storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
