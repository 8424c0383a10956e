//! Application service: the business rules between the API and the stores.
//!
//! [`Service`] only talks to trait objects, so any combination of cached
//! and uncached stores can sit underneath it.

mod errors;
mod image;
mod token;
mod user;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use errors::ServiceError;

use crate::image::{ImageFetcher, ImageStore};
use crate::token::TokenStore;
use crate::user::{PasswordCodec, UserStore};

/// Username and password as submitted by a client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// An access token together with a refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Orchestrates registration, login, the token lifecycle and images.
#[derive(Clone)]
pub struct Service {
    users: Arc<dyn UserStore>,
    images: Arc<dyn ImageStore>,
    fetcher: Arc<dyn ImageFetcher>,
    tokens: TokenStore,
    codec: PasswordCodec,
}

impl Service {
    pub fn new(
        users: Arc<dyn UserStore>,
        images: Arc<dyn ImageStore>,
        fetcher: Arc<dyn ImageFetcher>,
        tokens: TokenStore,
        codec: PasswordCodec,
    ) -> Self {
        Self {
            users,
            images,
            fetcher,
            tokens,
            codec,
        }
    }
}
