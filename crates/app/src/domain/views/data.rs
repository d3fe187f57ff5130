//! Saved View Data

use gabinet::{fields::EntityType, views::ViewConfig};

use crate::domain::views::records::SavedViewUuid;

/// New Saved View Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewSavedView {
    pub uuid: SavedViewUuid,
    pub entity_type: EntityType,
    pub name: String,
    pub config: ViewConfig,
}

/// Saved View Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct SavedViewUpdate {
    pub name: String,
    pub config: ViewConfig,
}
