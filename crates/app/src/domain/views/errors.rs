//! Saved views service errors.

use gabinet::views::ViewError;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewsServiceError {
    #[error("view already exists")]
    AlreadyExists,

    #[error("view not found")]
    NotFound,

    #[error("system views cannot be changed")]
    Immutable,

    #[error("invalid data")]
    InvalidData,

    #[error(transparent)]
    View(#[from] ViewError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ViewsServiceError {
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
