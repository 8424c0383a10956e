//! Error types for token issuance and validation
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("required token")]
    MissingToken,

    /// Bad signature, wrong kind, expired, revoked, or owned by someone else.
    #[error("invalid token or already expired")]
    InvalidToken,

    #[error("Token signing failed: {reason}")]
    SigningFailed {
        reason: String,
        #[source]
        source: jsonwebtoken::errors::Error,
    },
}

impl TokenError {
    /// Check if this error should be answered with "unauthorized".
    pub fn is_authentication_error(&self) -> bool {
        matches!(self, TokenError::MissingToken | TokenError::InvalidToken)
    }
}

impl From<TokenError> for crate::Error {
    fn from(err: TokenError) -> Self {
        crate::Error::Token(err)
    }
}
