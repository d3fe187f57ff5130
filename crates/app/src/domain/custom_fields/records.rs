//! Custom Field Records

use gabinet::fields::{EntityType, FieldDefinition, FieldKey, FieldType};
use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Custom Field UUID
pub type CustomFieldUuid = TypedUuid<CustomFieldRecord>;

/// Custom Field Definition Record
#[derive(Debug, Clone)]
pub struct CustomFieldRecord {
    pub uuid: CustomFieldUuid,
    pub entity_type: EntityType,
    pub key: FieldKey,
    pub name: String,
    pub field_type: FieldType,
    pub options: Vec<String>,
    pub required: bool,
    pub group: Option<String>,
    pub position: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&CustomFieldRecord> for FieldDefinition {
    fn from(record: &CustomFieldRecord) -> Self {
        Self {
            uuid: record.uuid.into_uuid(),
            entity_type: record.entity_type,
            key: record.key.clone(),
            name: record.name.clone(),
            field_type: record.field_type,
            options: record.options.clone(),
            required: record.required,
            group: record.group.clone(),
            position: record.position,
        }
    }
}
