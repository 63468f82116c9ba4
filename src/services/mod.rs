//! Business rules of the clients API, independent of the HTTP layer.

use thiserror::Error;

pub mod clients;

#[derive(Debug, Error)]
/// Errors returned by service functions and mapped to HTTP statuses by routes.
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
