//! One-time code delivery.

use async_trait::async_trait;
use gabinet::portal::OtpCode;
use mockall::automock;
use thiserror::Error;
use tracing::info;

use crate::domain::patients::records::PatientRecord;

#[derive(Debug, Error)]
pub enum OtpDeliveryError {
    #[error("failed to deliver sign-in code: {0}")]
    Failed(String),
}

/// Delivers sign-in codes to patients.
#[automock]
#[async_trait]
pub trait OtpSender: Send + Sync {
    /// Send `code` to the patient's email address.
    async fn send_otp(&self, patient: &PatientRecord, code: &OtpCode)
    -> Result<(), OtpDeliveryError>;
}

/// Writes codes to the log. For local development only.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingOtpSender;

#[async_trait]
impl OtpSender for TracingOtpSender {
    async fn send_otp(
        &self,
        patient: &PatientRecord,
        code: &OtpCode,
    ) -> Result<(), OtpDeliveryError> {
        info!(
            patient = %patient.uuid,
            email = %patient.email,
            code = code.as_str(),
            "portal sign-in code"
        );

        Ok(())
    }
}
