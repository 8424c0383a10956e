//! Database and cache creation from CLI configuration.

use std::path::PathBuf;
use std::sync::Arc;

use image_randomizer::{
    cache::{CacheStore, MemoryCache, RedisCache},
    constants::MEMORY_CACHE_CAPACITY,
    db::Database,
};

use crate::cli::{Backend, CacheDialect, DatabaseArgs, ServeArgs};

const SQLITE_FILE: &str = "image-randomizer.db";

/// Redact credentials from a connection URL for safe logging
pub fn redact_url(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url) {
        let mut redacted = parsed.clone();
        if !parsed.username().is_empty() {
            let _ = redacted.set_username("***");
        }
        if parsed.password().is_some() {
            let _ = redacted.set_password(Some("***"));
        }
        redacted.to_string()
    } else {
        "***@<unparsable-url>".to_string()
    }
}

/// Open the configured database, creating its schema if needed
pub async fn create_database(args: &DatabaseArgs) -> Result<Database, Box<dyn std::error::Error>> {
    match args.backend {
        Backend::Sqlite => {
            let data_dir = args.data_dir.clone().unwrap_or_else(|| PathBuf::from("."));
            tokio::fs::create_dir_all(&data_dir).await?;

            let db_path = data_dir.join(SQLITE_FILE);
            tracing::info!("Using SQLite backend at {}", db_path.display());
            Ok(Database::open_sqlite(&db_path, args.db_max_connections).await?)
        }
        Backend::Postgres => {
            let url = args
                .postgres_url
                .as_ref()
                .ok_or("PostgreSQL backend requires --postgres-url or IR_POSTGRES_URL")?;

            let display_url = redact_url(url);
            tracing::info!("Connecting to PostgreSQL backend at {}", display_url);

            match Database::connect_postgres(url, args.db_max_connections).await {
                Ok(db) => {
                    tracing::info!("Connected to PostgreSQL successfully");
                    Ok(db)
                }
                Err(e) => {
                    Err(format!("Failed to connect to PostgreSQL at {}: {}", display_url, e).into())
                }
            }
        }
    }
}

/// Cache tiers for one server process.
pub struct CacheTiers {
    /// Read-through tiers for user and image lookups, outermost first.
    pub tiers: Vec<(Arc<dyn CacheStore>, std::time::Duration)>,
    /// Where token identifiers live. Never a no-op store.
    pub tokens: Arc<dyn CacheStore>,
}

/// Build the cache tiers for the configured dialect.
///
/// - `nocache`: no read-through tiers; tokens in process memory
/// - `inmemory`: one process-local tier, also holding tokens
/// - `redis`: a short-lived process-local tier in front of Redis; tokens in
///   Redis so every process sees revocations
pub async fn create_caches(args: &ServeArgs) -> Result<CacheTiers, Box<dyn std::error::Error>> {
    let cache_ttl = std::time::Duration::from_secs(args.cache_ttl);
    let local_ttl = std::time::Duration::from_secs(args.local_cache_ttl);

    match args.cache {
        CacheDialect::Nocache => {
            tracing::info!("Caching disabled");
            Ok(CacheTiers {
                tiers: Vec::new(),
                tokens: Arc::new(MemoryCache::new(MEMORY_CACHE_CAPACITY)),
            })
        }
        CacheDialect::Inmemory => {
            tracing::info!("Using in-memory cache");
            let memory: Arc<dyn CacheStore> = Arc::new(MemoryCache::new(MEMORY_CACHE_CAPACITY));
            Ok(CacheTiers {
                tiers: vec![(memory.clone(), cache_ttl)],
                tokens: memory,
            })
        }
        CacheDialect::Redis => {
            let url = args
                .redis_url
                .as_ref()
                .ok_or("Redis cache requires --redis-url or IR_CACHE_ADDRESS")?;
            tracing::info!("Connecting to Redis cache at {}", redact_url(url));

            let redis: Arc<dyn CacheStore> = Arc::new(RedisCache::connect(url).await?);
            let local: Arc<dyn CacheStore> = Arc::new(MemoryCache::new(MEMORY_CACHE_CAPACITY));
            Ok(CacheTiers {
                tiers: vec![(local, local_ttl), (redis.clone(), cache_ttl)],
                tokens: redis,
            })
        }
    }
}
