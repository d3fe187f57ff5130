//! Saved View Handlers

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update;

use gabinet::views::ViewConfig;
use salvo::http::StatusError;
use serde_json::Value;

use crate::extensions::*;

/// Read a submitted view configuration. A missing config is an empty one. Operators are
/// checked by the service.
pub(crate) fn parse_config(config: Value) -> Result<ViewConfig, StatusError> {
    if config.is_null() {
        return Ok(ViewConfig::default());
    }

    serde_json::from_value(config).or_400("invalid view config")
}
