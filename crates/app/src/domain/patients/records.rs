//! Patient Records

use jiff::{Timestamp, civil::Date};

use crate::uuids::TypedUuid;

/// Patient UUID
pub type PatientUuid = TypedUuid<PatientRecord>;

/// Patient Record
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecord {
    pub uuid: PatientUuid,
    pub first_name: String,
    pub last_name: String,

    /// Unique per tenant, compared case-insensitively. Portal sign-in is keyed on it.
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<Date>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
