//! Test Helpers

use std::{sync::Mutex, time::Duration};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use gabinet::portal::OtpCode;
use jiff::{SignedDuration, Timestamp};
use testresult::TestResult;
use tokio::{sync::Notify, time::timeout};

use crate::{
    auth::{OpenBaoError, TokenVerifier},
    domain::{
        appointments::{data::NewAppointment, records::AppointmentUuid},
        patients::{
            PatientsService,
            data::NewPatient,
            records::{PatientRecord, PatientUuid},
        },
        portal::{OtpDeliveryError, OtpSender},
    },
    test::TestContext,
};

/// Captures sent codes so tests can complete a sign-in.
#[derive(Debug, Default)]
pub struct RecordingOtpSender {
    sent: Mutex<Vec<(String, String)>>,
    delivered: Notify,
}

impl RecordingOtpSender {
    /// Most recent code sent to `email` that has not been taken yet.
    pub fn last_code(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to.eq_ignore_ascii_case(email))
            .map(|(_, code)| code.clone())
    }

    /// Wait for the oldest untaken code sent to `email` and take it.
    pub async fn next_code(&self, email: &str) -> TestResult<String> {
        let wait = async {
            loop {
                let delivered = self.delivered.notified();

                if let Some(code) = self.take(email) {
                    return code;
                }

                delivered.await;
            }
        };

        Ok(timeout(Duration::from_secs(5), wait).await?)
    }

    fn take(&self, email: &str) -> Option<String> {
        let mut sent = self.sent.lock().unwrap();
        let index = sent.iter().position(|(to, _)| to.eq_ignore_ascii_case(email))?;

        Some(sent.remove(index).1)
    }
}

#[async_trait]
impl OtpSender for RecordingOtpSender {
    async fn send_otp(&self, patient: &PatientRecord, code: &OtpCode) -> Result<(), OtpDeliveryError> {
        self.sent
            .lock()
            .unwrap()
            .push((patient.email.clone(), code.as_str().to_string()));

        self.delivered.notify_waiters();

        Ok(())
    }
}

/// Deterministic stand-in for Transit HMAC.
#[derive(Debug, Clone, Copy)]
pub struct FakeTransit;

#[async_trait]
impl TokenVerifier for FakeTransit {
    async fn sign(&self, input: &[u8]) -> Result<String, OpenBaoError> {
        Ok(format!("fake:{}", BASE64.encode(input)))
    }

    async fn verify(&self, input: &[u8], verifier: &str) -> Result<bool, OpenBaoError> {
        Ok(self.sign(input).await? == verifier)
    }
}

pub(crate) fn new_patient(email: &str) -> NewPatient {
    NewPatient {
        uuid: PatientUuid::new(),
        first_name: "Anna".to_string(),
        last_name: "Nowak".to_string(),
        email: email.to_string(),
        phone: None,
        date_of_birth: None,
    }
}

pub(crate) async fn create_patient(ctx: &TestContext, email: &str) -> TestResult<PatientRecord> {
    Ok(ctx
        .patients
        .create_patient(ctx.tenant_uuid, new_patient(email))
        .await?)
}

pub(crate) fn new_appointment(patient: PatientUuid, starts_at: Timestamp) -> NewAppointment {
    NewAppointment {
        uuid: AppointmentUuid::new(),
        patient_uuid: patient,
        title: "Consultation".to_string(),
        starts_at,
        ends_at: starts_at + SignedDuration::from_mins(30),
        notes: None,
    }
}
