//! Contact Data

use crate::domain::contacts::records::ContactUuid;

/// New Contact Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewContact {
    pub uuid: ContactUuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,

    /// Defaults to `active`.
    pub status: Option<String>,
}

/// Contact Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct ContactUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub status: String,
}
