//! Patient Data

use jiff::civil::Date;

use crate::domain::patients::records::PatientUuid;

/// New Patient Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewPatient {
    pub uuid: PatientUuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<Date>,
}

/// Patient profile changes. The email address is fixed because portal sign-in depends on it.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<Date>,
}
