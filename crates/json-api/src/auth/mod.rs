//! Bearer authentication for staff and portal routes.

mod bearer;
pub(crate) mod middleware;
pub(crate) mod portal;

pub(crate) use bearer::extract_bearer_token;
