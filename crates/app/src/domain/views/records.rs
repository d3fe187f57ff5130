//! Saved View Records

use gabinet::{fields::EntityType, views::ViewConfig};
use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Saved View UUID
pub type SavedViewUuid = TypedUuid<SavedViewRecord>;

/// Saved View Record
#[derive(Debug, Clone)]
pub struct SavedViewRecord {
    pub uuid: SavedViewUuid,
    pub entity_type: EntityType,

    /// Set for system views only.
    pub slug: Option<String>,
    pub name: String,
    pub config: ViewConfig,

    /// System views are seeded per tenant and cannot be changed.
    pub is_system: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
