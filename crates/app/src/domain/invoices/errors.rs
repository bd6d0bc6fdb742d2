//! Invoices service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

/// Invoice service error variants.
#[derive(Debug, Error)]
pub enum InvoicesServiceError {
    /// Another invoice already uses the requested number.
    #[error("invoice number already taken")]
    DuplicateNumber,

    /// Invoice was not found.
    #[error("invoice not found")]
    NotFound,

    /// The invoice changed since the version the update was based on.
    #[error("invoice was modified by another request")]
    StaleVersion,

    /// Referenced related row does not exist.
    #[error("related resource not found")]
    InvalidReference,

    /// Required data was missing.
    #[error("missing required data")]
    MissingRequiredData,

    /// Provided data failed validation.
    #[error("invalid data")]
    InvalidData,

    /// Underlying SQL/storage error.
    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for InvoicesServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::DuplicateNumber,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let error = InvoicesServiceError::from(Error::RowNotFound);

        assert!(
            matches!(error, InvoicesServiceError::NotFound),
            "expected NotFound, got {error:?}"
        );
    }

    #[test]
    fn non_database_errors_are_storage_errors() {
        let error = InvoicesServiceError::from(Error::PoolTimedOut);

        assert!(
            matches!(error, InvoicesServiceError::Sql(_)),
            "expected Sql, got {error:?}"
        );
    }
}
