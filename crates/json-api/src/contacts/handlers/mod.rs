//! Contact Handlers

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update;

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use gabinet_app::domain::contacts::records::{ContactRecord, ContactUuid};

    pub(super) fn make_contact(uuid: ContactUuid) -> ContactRecord {
        ContactRecord {
            uuid,
            first_name: "Jan".to_string(),
            last_name: "Kowalski".to_string(),
            email: Some("jan@example.com".to_string()),
            phone: None,
            company_name: Some("Kowalski i Syn".to_string()),
            status: "active".to_string(),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            deleted_at: None,
        }
    }
}
