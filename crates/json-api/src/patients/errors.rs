//! Patient Errors

use salvo::http::StatusError;
use tracing::error;

use gabinet_app::domain::patients::PatientsServiceError;

pub(crate) fn into_status_error(error: PatientsServiceError) -> StatusError {
    match error {
        PatientsServiceError::AlreadyExists => {
            StatusError::conflict().brief("A patient with this email already exists")
        }
        PatientsServiceError::NotFound => StatusError::not_found().brief("Patient not found"),
        PatientsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid patient payload")
        }
        PatientsServiceError::Sql(source) => {
            error!("patient storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
