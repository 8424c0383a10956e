//!
//! Image Randomizer: serve a random image from each user's list of image URLs.
//!
//! ## Core Concepts
//!
//! The crate is organised as a stack of small layers, each behind a trait so
//! that layers can be composed and swapped:
//!
//! * **Users (`user::UserStore`)**: username to user record, with uniqueness
//!   enforced by the database. Passwords are hashed by `user::PasswordCodec`.
//! * **Images (`image::ImageStore`)**: per-user ordered lists of image URLs,
//!   every mutation scoped by `(image id, user id)`. Bytes are fetched by an
//!   `image::ImageFetcher`.
//! * **Caches (`cache::CacheStore`)**: expiring key-value stores (in-process,
//!   Redis, or none). Store decorators read through a cache and invalidate on
//!   every write.
//! * **Tokens (`token::TokenStore`)**: signed access/refresh JWTs whose opaque
//!   identifiers live in a cache; a token is only valid while its identifier
//!   is present.
//! * **Service (`service::Service`)**: registration, login, token lifecycle,
//!   image CRUD and random selection.
//! * **API (`api::router`)**: the axum HTTP surface over the service.

pub mod api;
pub mod cache;
pub mod clock;
pub mod constants;
pub mod db;
pub mod image;
pub mod service;
pub mod token;
pub mod user;

pub use clock::{Clock, SystemClock};

#[cfg(any(test, feature = "testing"))]
pub use clock::FixedClock;

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured errors from the SQL layer
    #[error(transparent)]
    Database(db::DatabaseError),

    /// Structured errors from cache stores
    #[error(transparent)]
    Cache(cache::CacheError),

    /// Structured errors from the user module
    #[error(transparent)]
    User(user::UserError),

    /// Structured errors from the image module
    #[error(transparent)]
    Image(image::ImageError),

    /// Structured errors from token issuance and validation
    #[error(transparent)]
    Token(token::TokenError),

    /// Structured errors from the service layer
    #[error(transparent)]
    Service(service::ServiceError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Database(_) => "db",
            Error::Cache(_) => "cache",
            Error::User(_) => "user",
            Error::Image(_) => "image",
            Error::Token(_) => "token",
            Error::Service(_) => "service",
        }
    }

    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::User(err) => err.is_not_found(),
            Error::Image(err) => err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error indicates a conflict (already exists).
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::User(err) => err.is_conflict(),
            _ => false,
        }
    }

    /// Check if this error was caused by bad caller input.
    ///
    /// Covers field validation, wrong credentials and unusable image
    /// references.
    pub fn is_validation_error(&self) -> bool {
        match self {
            Error::Service(err) => err.is_validation_error(),
            Error::User(err) => err.is_invalid_credentials(),
            Error::Image(err) => err.is_invalid_image(),
            _ => false,
        }
    }

    /// Check if this error is authentication-related.
    pub fn is_authentication_error(&self) -> bool {
        match self {
            Error::Token(err) => err.is_authentication_error(),
            _ => false,
        }
    }

    /// Check if this error is database-related.
    pub fn is_database_error(&self) -> bool {
        matches!(self, Error::Database(_))
    }

    /// Check if this error is cache-related.
    pub fn is_cache_error(&self) -> bool {
        matches!(self, Error::Cache(_))
    }

    /// Check if this error is something the caller can act on.
    ///
    /// Anything else is an internal failure whose details must not leave
    /// the process.
    pub fn is_client_error(&self) -> bool {
        self.is_not_found()
            || self.is_conflict()
            || self.is_validation_error()
            || self.is_authentication_error()
    }
}
