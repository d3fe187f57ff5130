//! Staff API token authentication.

mod errors;
pub mod models;
pub mod openbao;
mod repository;
mod service;
mod token;

pub use errors::*;
pub use models::*;
pub use openbao::{MockTokenVerifier, OpenBaoClient, OpenBaoConfig, OpenBaoError, TokenVerifier};
pub use service::*;
pub use token::*;
