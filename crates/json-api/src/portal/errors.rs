//! Portal Errors

use salvo::http::StatusError;
use tracing::error;

use gabinet::portal::PortalError;
use gabinet_app::domain::portal::PortalServiceError;

/// Sign-in and token failures become 401s carrying the message the patient sees.
pub(crate) fn into_status_error(error: PortalServiceError) -> StatusError {
    match error {
        PortalServiceError::Portal(source) => StatusError::unauthorized().brief(source.to_string()),
        PortalServiceError::NotFound => StatusError::not_found().brief("Patient not found"),
        PortalServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid profile payload")
        }
        PortalServiceError::Sql(source) => {
            error!("portal storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

/// Metric label for a failed sign-in or token check.
pub(crate) fn outcome(error: &PortalServiceError) -> &'static str {
    match error {
        PortalServiceError::Portal(PortalError::NoSession) => "no_session",
        PortalServiceError::Portal(PortalError::OtpExpired) => "otp_expired",
        PortalServiceError::Portal(PortalError::InvalidOtp) => "invalid_otp",
        PortalServiceError::Portal(PortalError::TooManyAttempts) => "too_many_attempts",
        PortalServiceError::Portal(PortalError::SessionInactive) => "session_inactive",
        PortalServiceError::Portal(PortalError::SessionExpired) => "session_expired",
        PortalServiceError::Portal(PortalError::InvalidToken) | PortalServiceError::NotFound => {
            "invalid_token"
        }
        PortalServiceError::InvalidData | PortalServiceError::Sql(_) => "error",
    }
}
