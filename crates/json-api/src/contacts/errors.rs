//! Contact Errors

use salvo::http::StatusError;
use tracing::error;

use gabinet_app::domain::contacts::ContactsServiceError;

pub(crate) fn into_status_error(error: ContactsServiceError) -> StatusError {
    match error {
        ContactsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Contact already exists")
        }
        ContactsServiceError::NotFound => StatusError::not_found().brief("Contact not found"),
        ContactsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid contact payload")
        }
        ContactsServiceError::ViewNotFound => StatusError::not_found().brief("View not found"),
        ContactsServiceError::InvalidView => {
            StatusError::bad_request().brief("View does not list contacts")
        }
        ContactsServiceError::Sql(source) => {
            error!("contact storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
