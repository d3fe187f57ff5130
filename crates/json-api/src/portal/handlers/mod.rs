//! Portal Handlers

pub(crate) mod appointments;
pub(crate) mod logout;
pub(crate) mod me;
pub(crate) mod otp;
pub(crate) mod session;
pub(crate) mod update_me;
