//! Error types for the user system
//!
//! Display strings of client-facing variants are shown to API callers
//! verbatim, so they carry no internal detail.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("user not found")]
    UserNotFound { username: String },

    #[error("duplicate username")]
    UsernameAlreadyExists { username: String },

    #[error("wrong username/password")]
    InvalidCredentials,

    #[error("Password hashing failed: {reason}")]
    HashingFailed { reason: String },

    #[error("Stored password hash is unreadable")]
    PasswordVerificationFailed,
}

impl UserError {
    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, UserError::UserNotFound { .. })
    }

    /// Check if this error indicates the username is taken.
    pub fn is_conflict(&self) -> bool {
        matches!(self, UserError::UsernameAlreadyExists { .. })
    }

    /// Check if this error is a failed login.
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, UserError::InvalidCredentials)
    }
}

impl From<UserError> for crate::Error {
    fn from(err: UserError) -> Self {
        crate::Error::User(err)
    }
}
