//! Custom Fields
//!
//! Tenants attach their own typed fields to the standard entities. Definitions describe a field,
//! values are stored per `(entity, definition)` pair and merged onto table rows as `cf_<key>`
//! columns on read.

use std::{fmt, str::FromStr};

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::values::Row;

/// Prefix of merged custom field columns.
pub const CUSTOM_FIELD_COLUMN_PREFIX: &str = "cf_";

/// Row key holding the entity UUID.
pub const ROW_UUID_KEY: &str = "uuid";

const FIELD_KEY_MAX_LEN: usize = 64;

/// Custom field errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    /// Field key is not a lowercase slug.
    #[error("invalid field key: {0:?}")]
    InvalidKey(String),

    /// Unknown entity type name.
    #[error("unknown entity type: {0:?}")]
    UnknownEntityType(String),

    /// Unknown field type name.
    #[error("unknown field type: {0:?}")]
    UnknownFieldType(String),

    /// Select fields need at least one option.
    #[error("select fields need at least one option")]
    MissingOptions,

    /// Only select fields carry options.
    #[error("only select fields carry options")]
    UnexpectedOptions,

    /// An option is blank.
    #[error("options cannot be blank")]
    BlankOption,

    /// An option appears twice.
    #[error("duplicate option: {0:?}")]
    DuplicateOption(String),

    /// A required field was given an empty value.
    #[error("field {0:?} is required")]
    RequiredValue(String),

    /// A value was written through a definition of another entity type.
    #[error("field {key:?} belongs to {expected}, not {actual}")]
    EntityTypeMismatch {
        /// Key of the offending definition.
        key: String,
        /// Entity type the definition belongs to.
        expected: EntityType,
        /// Entity type of the write.
        actual: EntityType,
    },
}

/// Entities that accept custom fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// CRM contact.
    Contact,

    /// CRM company.
    Company,

    /// Sales lead.
    Lead,

    /// Uploaded document.
    Document,

    /// Clinic patient.
    Patient,
}

impl EntityType {
    /// Stable storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Company => "company",
            Self::Lead => "lead",
            Self::Document => "document",
            Self::Patient => "patient",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = FieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "contact" => Ok(Self::Contact),
            "company" => Ok(Self::Company),
            "lead" => Ok(Self::Lead),
            "document" => Ok(Self::Document),
            "patient" => Ok(Self::Patient),
            other => Err(FieldError::UnknownEntityType(other.to_string())),
        }
    }
}

/// Custom field value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Free text.
    Text,

    /// Number.
    Number,

    /// Calendar date.
    Date,

    /// One of the options.
    Select,

    /// Any subset of the options.
    MultiSelect,

    /// Boolean.
    Checkbox,

    /// Web address.
    Url,

    /// Email address.
    Email,

    /// Phone number.
    Phone,

    /// Stored file reference.
    File,
}

impl FieldType {
    /// Stable storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Select => "select",
            Self::MultiSelect => "multi_select",
            Self::Checkbox => "checkbox",
            Self::Url => "url",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::File => "file",
        }
    }

    /// Whether values are picked from enumerated options.
    #[must_use]
    pub const fn has_options(self) -> bool {
        matches!(self, Self::Select | Self::MultiSelect)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = FieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "date" => Ok(Self::Date),
            "select" => Ok(Self::Select),
            "multi_select" => Ok(Self::MultiSelect),
            "checkbox" => Ok(Self::Checkbox),
            "url" => Ok(Self::Url),
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "file" => Ok(Self::File),
            other => Err(FieldError::UnknownFieldType(other.to_string())),
        }
    }
}

/// Field key: a lowercase slug starting with a letter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldKey(String);

impl FieldKey {
    /// Validate and wrap a key.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidKey`] unless the key matches `[a-z][a-z0-9_]{0,63}`.
    pub fn parse(key: impl Into<String>) -> Result<Self, FieldError> {
        let key = key.into();

        let mut chars = key.chars();
        let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_lowercase());
        let rest_is_slug = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

        if !starts_with_letter || !rest_is_slug || key.len() > FIELD_KEY_MAX_LEN {
            return Err(FieldError::InvalidKey(key));
        }

        Ok(Self(key))
    }

    /// Borrow the key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the merged row column.
    #[must_use]
    pub fn column_name(&self) -> String {
        format!("{CUSTOM_FIELD_COLUMN_PREFIX}{}", self.0)
    }
}

impl TryFrom<String> for FieldKey {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl FromStr for FieldKey {
    type Err = FieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl From<FieldKey> for String {
    fn from(value: FieldKey) -> Self {
        value.0
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A custom field definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Definition UUID.
    pub uuid: Uuid,

    /// Entity type the field is attached to.
    pub entity_type: EntityType,

    /// Field key, unique per entity type.
    pub key: FieldKey,

    /// Display name.
    pub name: String,

    /// Value type.
    pub field_type: FieldType,

    /// Enumerated options for select types.
    #[serde(default)]
    pub options: Vec<String>,

    /// Whether a value may be cleared.
    #[serde(default)]
    pub required: bool,

    /// Optional display group.
    #[serde(default)]
    pub group: Option<String>,

    /// Display order within the entity type.
    #[serde(default)]
    pub position: i32,
}

impl FieldDefinition {
    /// Check that the options agree with the field type.
    ///
    /// # Errors
    ///
    /// Returns an error when a select field has no options, a non-select field has options, or
    /// an option is blank or repeated.
    pub fn validate(&self) -> Result<(), FieldError> {
        validate_options(self.field_type, &self.options)
    }

    /// Presence check applied when a value is written.
    ///
    /// Values are not checked against the field type; clearing a required field is the only
    /// rejected write.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::RequiredValue`] when a required field is given an empty value.
    pub fn check_value(&self, value: &Value) -> Result<(), FieldError> {
        if self.required && value_is_blank(value) {
            return Err(FieldError::RequiredValue(self.key.to_string()));
        }

        Ok(())
    }

    /// Check that a write for `entity_type` may go through this definition.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::EntityTypeMismatch`] when the definition belongs elsewhere.
    pub fn check_entity_type(&self, entity_type: EntityType) -> Result<(), FieldError> {
        if self.entity_type != entity_type {
            return Err(FieldError::EntityTypeMismatch {
                key: self.key.to_string(),
                expected: self.entity_type,
                actual: entity_type,
            });
        }

        Ok(())
    }
}

/// Check that `options` agree with `field_type`.
///
/// # Errors
///
/// See [`FieldDefinition::validate`].
pub fn validate_options(field_type: FieldType, options: &[String]) -> Result<(), FieldError> {
    if !field_type.has_options() {
        return if options.is_empty() {
            Ok(())
        } else {
            Err(FieldError::UnexpectedOptions)
        };
    }

    if options.is_empty() {
        return Err(FieldError::MissingOptions);
    }

    let mut seen = FxHashSet::default();

    for option in options {
        if option.trim().is_empty() {
            return Err(FieldError::BlankOption);
        }

        if !seen.insert(option.as_str()) {
            return Err(FieldError::DuplicateOption(option.clone()));
        }
    }

    Ok(())
}

/// Stored values grouped by entity UUID, then definition UUID.
pub type FieldValues = FxHashMap<Uuid, FxHashMap<Uuid, Value>>;

/// Merge stored custom field values onto rows.
///
/// Every definition of `entity_type` becomes a `cf_<key>` column on every row, `null` when the
/// row has no stored value. Rows are matched through their `uuid` column; rows without one only
/// receive `null` columns.
pub fn merge_custom_fields(
    rows: &mut [Row],
    entity_type: EntityType,
    definitions: &[FieldDefinition],
    values: &FieldValues,
) {
    let columns: Vec<(Uuid, String)> = definitions
        .iter()
        .filter(|definition| definition.entity_type == entity_type)
        .map(|definition| (definition.uuid, definition.key.column_name()))
        .collect();

    for row in rows.iter_mut() {
        let stored = row
            .get(ROW_UUID_KEY)
            .and_then(Value::as_str)
            .and_then(|uuid| Uuid::try_parse(uuid).ok())
            .and_then(|uuid| values.get(&uuid));

        for (definition_uuid, column) in &columns {
            let value = stored
                .and_then(|stored| stored.get(definition_uuid))
                .cloned()
                .unwrap_or(Value::Null);

            row.insert(column.clone(), value);
        }
    }
}

fn value_is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
