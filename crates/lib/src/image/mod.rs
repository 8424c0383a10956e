//! Image references and their stores.
//!
//! An image is a URL owned by a user. Every mutation is scoped by
//! `(id, user_id)`: a user can never touch a row they do not own, and a
//! row they do not own is indistinguishable from one that does not exist.

mod cache;
mod errors;
mod fetch;
mod sql;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use cache::CachedImageStore;
pub use errors::ImageError;
pub use fetch::{HttpImageFetcher, ImageBody, ImageFetcher};
pub use sql::SqlImageStore;

use crate::Result;

/// A stored image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: i64,
    pub user_id: i64,
    pub image: String,
}

/// An image reference that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    pub user_id: i64,
    pub image: String,
}

/// Storage for image references.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// All images of a user, oldest first. Empty when there are none.
    async fn get(&self, user_id: i64) -> Result<Vec<Image>>;

    /// Store a new image and return it with its assigned id.
    async fn create(&self, image: NewImage) -> Result<Image>;

    /// Replace the reference of the row matching `(image.id, image.user_id)`.
    ///
    /// Fails with [`ImageError::NotFound`] when no row matches.
    async fn update(&self, image: &Image) -> Result<()>;

    /// Delete the row matching `(id, user_id)`.
    ///
    /// Fails with [`ImageError::NotFound`] when no row matches.
    async fn delete(&self, id: i64, user_id: i64) -> Result<()>;
}
