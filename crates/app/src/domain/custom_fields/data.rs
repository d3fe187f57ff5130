//! Custom Field Data

use gabinet::fields::{EntityType, FieldDefinition, FieldKey, FieldType};
use serde_json::Value;

use crate::domain::custom_fields::records::{CustomFieldRecord, CustomFieldUuid};

/// New Custom Field Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomField {
    pub uuid: CustomFieldUuid,
    pub entity_type: EntityType,
    pub key: FieldKey,
    pub name: String,
    pub field_type: FieldType,
    pub options: Vec<String>,
    pub required: bool,
    pub group: Option<String>,
    pub position: i32,
}

impl NewCustomField {
    /// The definition this data would create.
    #[must_use]
    pub fn definition(&self) -> FieldDefinition {
        FieldDefinition {
            uuid: self.uuid.into_uuid(),
            entity_type: self.entity_type,
            key: self.key.clone(),
            name: self.name.clone(),
            field_type: self.field_type,
            options: self.options.clone(),
            required: self.required,
            group: self.group.clone(),
            position: self.position,
        }
    }
}

/// Custom Field Update Data
///
/// The key, entity type and field type are fixed once created.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomFieldUpdate {
    pub name: String,
    pub options: Vec<String>,
    pub required: bool,
    pub group: Option<String>,
    pub position: i32,
}

impl CustomFieldUpdate {
    /// The definition after applying this update to `current`.
    #[must_use]
    pub fn apply_to(&self, current: &CustomFieldRecord) -> FieldDefinition {
        FieldDefinition {
            name: self.name.clone(),
            options: self.options.clone(),
            required: self.required,
            group: self.group.clone(),
            position: self.position,
            ..FieldDefinition::from(current)
        }
    }
}

/// One value in a bulk write. A `null` value clears the stored value.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomFieldValue {
    pub field: CustomFieldUuid,
    pub value: Value,
}
