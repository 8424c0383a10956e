use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::{NewUser, User, UserStore};
use crate::Result;
use crate::cache::{CacheStore, cache_key, get_json, set_json};
use crate::constants::USER_PREFIX;

fn username_key(username: &str) -> String {
    cache_key(&[USER_PREFIX, "username", username])
}

/// Read-through cache in front of another [`UserStore`].
///
/// Lookups are served from the cache when possible and populate it on a
/// miss. `create` drops the username's entry before delegating, so a cached
/// "not found" never outlives a registration.
#[derive(Clone)]
pub struct CachedUserStore {
    inner: Arc<dyn UserStore>,
    cache: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl CachedUserStore {
    pub fn new(inner: Arc<dyn UserStore>, cache: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }
}

#[async_trait]
impl UserStore for CachedUserStore {
    async fn get_by_username(&self, username: &str) -> Result<User> {
        let key = username_key(username);
        if let Some(user) = get_json::<User>(self.cache.as_ref(), &key).await {
            tracing::debug!(key, "User cache hit");
            return Ok(user);
        }

        tracing::debug!(key, "User cache miss");
        let user = self.inner.get_by_username(username).await?;
        set_json(self.cache.as_ref(), &key, &user, self.ttl).await?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<User> {
        self.cache.delete(&username_key(&user.username)).await?;
        self.inner.create(user).await
    }
}
