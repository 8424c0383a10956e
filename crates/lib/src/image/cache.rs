use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::{Image, ImageStore, NewImage};
use crate::Result;
use crate::cache::{CacheStore, cache_key, get_json, set_json};
use crate::constants::IMAGES_PREFIX;

fn user_images_key(user_id: i64) -> String {
    cache_key(&[IMAGES_PREFIX, "user_id", &user_id.to_string()])
}

/// Read-through cache of per-user image lists in front of another
/// [`ImageStore`].
///
/// Every write drops the owner's list before delegating, so the next read
/// goes to the inner store. If the list cannot be dropped the write is not
/// attempted.
#[derive(Clone)]
pub struct CachedImageStore {
    inner: Arc<dyn ImageStore>,
    cache: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl CachedImageStore {
    pub fn new(inner: Arc<dyn ImageStore>, cache: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }

    async fn invalidate(&self, user_id: i64) -> Result<()> {
        self.cache.delete(&user_images_key(user_id)).await
    }
}

#[async_trait]
impl ImageStore for CachedImageStore {
    async fn get(&self, user_id: i64) -> Result<Vec<Image>> {
        let key = user_images_key(user_id);
        if let Some(images) = get_json::<Vec<Image>>(self.cache.as_ref(), &key).await {
            tracing::debug!(key, "Image cache hit");
            return Ok(images);
        }

        tracing::debug!(key, "Image cache miss");
        let images = self.inner.get(user_id).await?;
        set_json(self.cache.as_ref(), &key, &images, self.ttl).await?;
        Ok(images)
    }

    async fn create(&self, image: NewImage) -> Result<Image> {
        self.invalidate(image.user_id).await?;
        self.inner.create(image).await
    }

    async fn update(&self, image: &Image) -> Result<()> {
        self.invalidate(image.user_id).await?;
        self.inner.update(image).await
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<()> {
        self.invalidate(user_id).await?;
        self.inner.delete(id, user_id).await
    }
}
