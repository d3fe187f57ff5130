//! Saved Views
//!
//! A saved view is a table configuration: a filter, an optional sort and the visible columns.
//! System views ship with the crate and are seeded for every tenant.

use std::cmp::{Ordering, Reverse};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    fields::EntityType,
    filters::{FilterError, ViewFilter},
    values::{Row, as_number, as_text, is_empty},
};

const SYSTEM_VIEWS_YAML: &str = include_str!("views/system_views.yaml");

/// Saved view errors.
#[derive(Debug, Error)]
pub enum ViewError {
    /// View name is blank.
    #[error("view name cannot be blank")]
    BlankName,

    /// Filter failed validation.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Sort field is blank.
    #[error("sort field cannot be blank")]
    BlankSortField,

    /// Bundled system views could not be parsed.
    #[error("failed to parse system views: {0}")]
    SystemViews(#[from] serde_norway::Error),
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,

    /// Largest first.
    Desc,
}

/// Sort configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Row field to sort by.
    pub field: String,

    /// Direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    /// Sort rows in place.
    ///
    /// Values that read as numbers come first in numeric order, the rest follow as case-folded
    /// text. Empty values sort last in either direction. The sort is stable.
    pub fn sort(&self, rows: &mut [Row]) {
        // Empty values share one `None` key so they keep their input order.
        let key = |row: &Row| {
            let value = row.get(&self.field);
            let empty = is_empty(value);

            (empty, (!empty).then(|| SortKey::of(value)))
        };

        match self.direction {
            SortDirection::Asc => rows.sort_by_cached_key(key),
            SortDirection::Desc => rows.sort_by_cached_key(|row| {
                let (empty, value) = key(row);

                (empty, Reverse(value))
            }),
        }
    }
}

/// A row's sort position, computed once per row so every comparison agrees.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(f64),
    Text(String),
}

impl SortKey {
    fn of(value: Option<&Value>) -> Self {
        let number = as_number(value);

        if number.is_nan() {
            Self::Text(as_text(value).to_lowercase())
        } else {
            Self::Number(number)
        }
    }
}

impl Eq for SortKey {}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(left), Self::Number(right)) => left.total_cmp(right),
            (Self::Text(left), Self::Text(right)) => left.cmp(right),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

/// Table configuration stored with a saved view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Row filter.
    #[serde(default)]
    pub filters: ViewFilter,

    /// Optional sort.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,

    /// Visible columns, in display order. Empty shows every column.
    #[serde(default)]
    pub columns: SmallVec<[String; 8]>,
}

impl ViewConfig {
    /// Filter, then sort.
    #[must_use]
    pub fn apply(&self, rows: Vec<Row>) -> Vec<Row> {
        let mut rows = self.filters.apply(rows);

        if let Some(sort) = &self.sort {
            sort.sort(&mut rows);
        }

        rows
    }

    /// Validate a configuration submitted for storage.
    ///
    /// # Errors
    ///
    /// Returns an error when the filter has unknown operators or blank fields, or the sort
    /// field is blank.
    pub fn validate(&self) -> Result<(), ViewError> {
        self.filters.validate()?;

        if let Some(sort) = &self.sort
            && sort.field.trim().is_empty()
        {
            return Err(ViewError::BlankSortField);
        }

        Ok(())
    }
}

/// A view bundled with the crate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SystemView {
    /// Stable identifier, unique per entity type.
    pub slug: String,

    /// Display name.
    pub name: String,

    /// Entity type the view lists.
    pub entity_type: EntityType,

    /// Table configuration.
    #[serde(flatten)]
    pub config: ViewConfig,
}

#[derive(Debug, Deserialize)]
struct SystemViewsDocument {
    views: Vec<SystemView>,
}

/// Parse the bundled system views.
///
/// # Errors
///
/// Returns an error when the bundled YAML does not parse or a view fails validation.
pub fn system_views() -> Result<Vec<SystemView>, ViewError> {
    let document: SystemViewsDocument = serde_norway::from_str(SYSTEM_VIEWS_YAML)?;

    for view in &document.views {
        validate_name(&view.name)?;
        view.config.validate()?;
    }

    Ok(document.views)
}

/// Reject blank view names.
///
/// # Errors
///
/// Returns [`ViewError::BlankName`] for names that are empty after trimming.
pub fn validate_name(name: &str) -> Result<(), ViewError> {
    if name.trim().is_empty() {
        return Err(ViewError::BlankName);
    }

    Ok(())
}
