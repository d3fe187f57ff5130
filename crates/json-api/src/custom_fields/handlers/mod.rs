//! Custom Field Handlers

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod index;
pub(crate) mod update;
pub(crate) mod values;

use gabinet::fields::EntityType;
use salvo::http::StatusError;

use gabinet_app::domain::custom_fields::CustomFieldsServiceError;

use crate::custom_fields::errors::into_status_error;

/// Parse an entity type name, answering 400 for unknown names.
pub(crate) fn parse_entity_type(value: &str) -> Result<EntityType, StatusError> {
    value
        .parse::<EntityType>()
        .map_err(|error| into_status_error(CustomFieldsServiceError::Field(error)))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use gabinet::fields::{FieldKey, FieldType};
    use gabinet_app::domain::custom_fields::records::{CustomFieldRecord, CustomFieldUuid};

    use super::*;

    pub(super) fn make_field(uuid: CustomFieldUuid, key: &str) -> CustomFieldRecord {
        CustomFieldRecord {
            uuid,
            entity_type: EntityType::Contact,
            key: FieldKey::parse(key).expect("valid field key"),
            name: "Source".to_string(),
            field_type: FieldType::Select,
            options: vec!["web".to_string(), "referral".to_string()],
            required: false,
            group: None,
            position: 0,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn unknown_entity_types_are_bad_requests() {
        let status = parse_entity_type("invoice").err();

        assert_eq!(status.map(|s| s.code.as_u16()), Some(400));
    }
}
