//! Appointment Data

use jiff::Timestamp;

use crate::domain::{appointments::records::AppointmentUuid, patients::records::PatientUuid};

/// New Appointment Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub uuid: AppointmentUuid,
    pub patient_uuid: PatientUuid,
    pub title: String,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub notes: Option<String>,
}
