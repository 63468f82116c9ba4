//! Request bodies and input forms, validated before they reach the domain.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod client;
pub mod edit;
pub mod login;
#[cfg(feature = "server")]
pub mod upload;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid client id")]
    InvalidClientId,

    #[error("invalid email address")]
    InvalidEmail,

    #[error("{0} must not be blank")]
    Blank(&'static str),

    #[error("{0}")]
    Constraint(TypeConstraintError),

    #[error("at least one {0} is required")]
    EmptyBatch(&'static str),
}

impl FormError {
    /// Maps a constraint failure on a named field to a form error.
    pub(crate) fn field(field: &'static str) -> impl Fn(TypeConstraintError) -> FormError {
        move |err| match err {
            TypeConstraintError::EmptyString => FormError::Blank(field),
            TypeConstraintError::InvalidEmail => FormError::InvalidEmail,
            TypeConstraintError::NonPositiveId => FormError::InvalidClientId,
            other => FormError::Constraint(other),
        }
    }
}
