//! Error types for cache stores
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache backend failed: {reason}")]
    Backend { reason: String },

    #[error("cache value for {key} could not be encoded")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CacheError {
    /// Check if the cache itself (connection, server) failed.
    pub fn is_backend_error(&self) -> bool {
        matches!(self, CacheError::Backend { .. })
    }
}

impl From<CacheError> for crate::Error {
    fn from(err: CacheError) -> Self {
        crate::Error::Cache(err)
    }
}
