//! Expiring key-value stores used for read-through caching and tokens.
//!
//! [`CacheStore`] is string-typed and object safe so the same
//! `Arc<dyn CacheStore>` can back user records, image lists and token
//! identifiers. Typed access goes through [`get_json`] and [`set_json`].
//!
//! Implementations:
//!
//! - [`MemoryCache`]: in-process, per-entry TTL
//! - [`RedisCache`] (feature: `redis`): shared across processes
//! - [`NoCache`]: never stores anything

mod errors;
mod memory;
mod nop;
#[cfg(feature = "redis")]
mod redis_cache;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

pub use errors::CacheError;
pub use memory::MemoryCache;
pub use nop::NoCache;
#[cfg(feature = "redis")]
pub use redis_cache::RedisCache;

use crate::Result;
use crate::constants::KEY_SEPARATOR;

/// An expiring key-value store.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get the value stored under `key`, if present and not expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key` for at most `ttl`.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Join key parts with the cache key separator.
///
/// ```
/// use image_randomizer::cache::cache_key;
///
/// assert_eq!(cache_key(&["user", "username", "alice"]), "user:username:alice");
/// ```
pub fn cache_key(parts: &[&str]) -> String {
    parts.join(KEY_SEPARATOR)
}

/// Read and decode a JSON value.
///
/// A failing cache or an undecodable value is treated as a miss, so callers
/// fall through to the authoritative store.
pub async fn get_json<T: DeserializeOwned>(cache: &dyn CacheStore, key: &str) -> Option<T> {
    let raw = match cache.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "Cache read failed, treating as miss");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding undecodable cache entry");
            None
        }
    }
}

/// Encode a value as JSON and store it.
pub async fn set_json<T: Serialize + ?Sized>(
    cache: &dyn CacheStore,
    key: &str,
    value: &T,
    ttl: Duration,
) -> Result<()> {
    let raw = serde_json::to_string(value).map_err(|source| CacheError::Encode {
        key: key.to_string(),
        source,
    })?;
    cache.set(key, raw, ttl).await
}
