//! Saved View Errors

use salvo::http::StatusError;
use tracing::error;

use gabinet_app::domain::views::ViewsServiceError;

pub(crate) fn into_status_error(error: ViewsServiceError) -> StatusError {
    match error {
        ViewsServiceError::AlreadyExists => StatusError::conflict().brief("View already exists"),
        ViewsServiceError::NotFound => StatusError::not_found().brief("View not found"),
        ViewsServiceError::Immutable => {
            StatusError::forbidden().brief("System views cannot be changed")
        }
        ViewsServiceError::InvalidData => StatusError::bad_request().brief("Invalid view payload"),
        ViewsServiceError::View(source) => StatusError::bad_request().brief(source.to_string()),
        ViewsServiceError::Sql(source) => {
            error!("saved view storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
