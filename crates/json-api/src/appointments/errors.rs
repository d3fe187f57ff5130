//! Appointment Errors

use salvo::http::StatusError;
use tracing::error;

use gabinet_app::domain::appointments::AppointmentsServiceError;

pub(crate) fn into_status_error(error: AppointmentsServiceError) -> StatusError {
    match error {
        AppointmentsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Appointment already exists")
        }
        AppointmentsServiceError::NotFound => {
            StatusError::not_found().brief("Appointment not found")
        }
        AppointmentsServiceError::InvalidReference => {
            StatusError::bad_request().brief("Patient not found")
        }
        AppointmentsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid appointment payload")
        }
        AppointmentsServiceError::Calendar(source) => {
            StatusError::bad_request().brief(source.to_string())
        }
        AppointmentsServiceError::TimeZone(source) => {
            StatusError::bad_request().brief(format!("time zone conversion failed: {source}"))
        }
        AppointmentsServiceError::Sql(source) => {
            error!("appointment storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
