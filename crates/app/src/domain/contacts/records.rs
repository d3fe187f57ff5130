//! Contact Records

use gabinet::{fields::ROW_UUID_KEY, values::Row};
use jiff::Timestamp;
use serde_json::Value;

use crate::uuids::TypedUuid;

/// Contact UUID
pub type ContactUuid = TypedUuid<ContactRecord>;

/// Columns every contact row carries before custom fields are merged.
pub const CONTACT_COLUMNS: [&str; 9] = [
    ROW_UUID_KEY,
    "first_name",
    "last_name",
    "email",
    "phone",
    "company_name",
    "status",
    "created_at",
    "updated_at",
];

/// Contact Record
#[derive(Debug, Clone)]
pub struct ContactRecord {
    pub uuid: ContactUuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl ContactRecord {
    /// The contact as a table row keyed by column name.
    #[must_use]
    pub fn to_row(&self) -> Row {
        let optional = |value: Option<&String>| value.map_or(Value::Null, |v| Value::from(v.as_str()));

        let mut row = Row::default();

        row.insert(ROW_UUID_KEY.to_string(), Value::from(self.uuid.to_string()));
        row.insert("first_name".to_string(), Value::from(self.first_name.as_str()));
        row.insert("last_name".to_string(), Value::from(self.last_name.as_str()));
        row.insert("email".to_string(), optional(self.email.as_ref()));
        row.insert("phone".to_string(), optional(self.phone.as_ref()));
        row.insert("company_name".to_string(), optional(self.company_name.as_ref()));
        row.insert("status".to_string(), Value::from(self.status.as_str()));
        row.insert("created_at".to_string(), Value::from(self.created_at.to_string()));
        row.insert("updated_at".to_string(), Value::from(self.updated_at.to_string()));

        row
    }
}

/// Contacts rendered for a table: merged custom fields, filtered and sorted by a view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactTable {
    /// Column names in display order.
    pub columns: Vec<String>,

    /// Rows keyed by column name.
    pub rows: Vec<Row>,
}
