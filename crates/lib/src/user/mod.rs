//! User records and their stores.
//!
//! [`UserStore`] is implemented by [`SqlUserStore`] (authoritative) and by
//! [`CachedUserStore`], which wraps any other `UserStore`.

mod cache;
mod crypto;
mod errors;
mod sql;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use cache::CachedUserStore;
pub use crypto::{PasswordCodec, PasswordDigest};
pub use errors::UserError;
pub use sql::SqlUserStore;

use crate::Result;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub password_salt: String,
}

/// A user that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub password_salt: String,
}

/// Storage for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by (normalized) username.
    ///
    /// Fails with [`UserError::UserNotFound`] when no such user exists.
    async fn get_by_username(&self, username: &str) -> Result<User>;

    /// Store a new user and return it with its assigned id.
    ///
    /// Fails with [`UserError::UsernameAlreadyExists`] when the username is
    /// taken.
    async fn create(&self, user: NewUser) -> Result<User>;
}
