//! Contacts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContactsServiceError {
    #[error("contact already exists")]
    AlreadyExists,

    #[error("contact not found")]
    NotFound,

    #[error("invalid data")]
    InvalidData,

    #[error("view not found")]
    ViewNotFound,

    #[error("view does not list contacts")]
    InvalidView,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ContactsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
