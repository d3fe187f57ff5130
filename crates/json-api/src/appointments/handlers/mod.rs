//! Appointment Handlers

pub(crate) mod calendar;
pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod status;
