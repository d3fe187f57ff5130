//! Patient Portal

pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod sender;
pub mod service;

pub use errors::PortalServiceError;
pub use sender::{OtpDeliveryError, OtpSender, TracingOtpSender};
pub use service::*;
