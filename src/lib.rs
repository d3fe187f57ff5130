//! Gabinet
//!
//! Gabinet is the domain engine behind a multi-tenant CRM and clinic workspace: tenant-defined
//! custom fields, saved-view filtering, patient portal credentials and calendar layout.

pub mod calendar;
pub mod fields;
pub mod filters;
pub mod portal;
pub mod prelude;
pub mod values;
pub mod views;
