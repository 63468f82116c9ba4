//! Error conversion glue between the layers of the server.
//!
//! The domain layer must not depend on service or repository error types, so
//! the conversions live here.

use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;
use crate::services::ServiceError;
use crate::sheet::ImportError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::Validation(val.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

impl From<FormError> for ServiceError {
    fn from(val: FormError) -> Self {
        ServiceError::Validation(val.to_string())
    }
}

impl From<ImportError> for ServiceError {
    fn from(val: ImportError) -> Self {
        ServiceError::Validation(val.to_string())
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(val: RepositoryError) -> Self {
        match val {
            RepositoryError::NotFound => ServiceError::NotFound("Client not found".to_string()),
            RepositoryError::Duplicate(message) => ServiceError::Conflict(message),
            RepositoryError::ValidationError(message)
            | RepositoryError::ConstraintViolation(message) => ServiceError::Validation(message),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}
