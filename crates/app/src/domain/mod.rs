//! Gabinet domain services.

pub mod appointments;
pub mod contacts;
pub mod custom_fields;
pub mod patients;
pub mod portal;
pub mod tenants;
pub mod views;
