//! Error types for request validation in the service layer
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("required field {field}")]
    RequiredField { field: &'static str },

    #[error("field {field} must be in url format")]
    InvalidUrl { field: &'static str },
}

impl ServiceError {
    /// Check if this error was caused by bad caller input.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ServiceError::RequiredField { .. } | ServiceError::InvalidUrl { .. }
        )
    }
}

impl From<ServiceError> for crate::Error {
    fn from(err: ServiceError) -> Self {
        crate::Error::Service(err)
    }
}
