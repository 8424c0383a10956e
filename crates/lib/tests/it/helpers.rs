use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use image_randomizer::{
    FixedClock, SystemClock,
    cache::{CacheStore, MemoryCache},
    db::Database,
    image::{CachedImageStore, HttpImageFetcher, ImageStore, SqlImageStore},
    service::Service,
    token::{TokenSettings, TokenStore},
    user::{CachedUserStore, PasswordCodec, SqlUserStore, UserStore},
};

// Re-export tokio test macro for convenience
pub use tokio;

pub const ACCESS_TTL: Duration = Duration::from_secs(15 * 60);
pub const REFRESH_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
pub const CACHE_TTL: Duration = Duration::from_secs(60);

/// Creates a test database based on TEST_BACKEND env var.
///
/// Supported values:
/// - "sqlite" or unset: SQLite in-memory database (default)
/// - "postgres": PostgreSQL in an isolated schema (TEST_POSTGRES_URL)
///
/// # Example
/// ```bash
/// cargo test
///
/// TEST_BACKEND=postgres TEST_POSTGRES_URL="postgres://localhost/images_test" cargo test
/// ```
pub async fn test_database() -> Database {
    match std::env::var("TEST_BACKEND").as_deref() {
        Ok("postgres") => {
            let url = std::env::var("TEST_POSTGRES_URL")
                .unwrap_or_else(|_| "postgres://localhost/images_test".to_string());
            Database::connect_postgres_isolated(&url)
                .await
                .expect("Failed to connect to PostgreSQL")
        }
        Ok("sqlite") | Err(_) => Database::sqlite_in_memory()
            .await
            .expect("Failed to create SQLite database"),
        Ok(other) => panic!("Unknown TEST_BACKEND: {other}"),
    }
}

/// Everything a service test might want to poke at directly.
pub struct TestContext {
    pub service: Service,
    pub users: Arc<dyn UserStore>,
    pub images: Arc<dyn ImageStore>,
    pub cache: Arc<MemoryCache>,
    pub tokens: TokenStore,
}

pub fn test_tokens(cache: Arc<dyn CacheStore>) -> TokenStore {
    TokenStore::new(
        cache,
        TokenSettings::new("test-access-secret", ACCESS_TTL),
        TokenSettings::new("test-refresh-secret", REFRESH_TTL),
        Arc::new(SystemClock),
    )
}

/// Same as [`test_tokens`] but on a controllable clock.
pub fn test_tokens_with_clock(cache: Arc<dyn CacheStore>, clock: Arc<FixedClock>) -> TokenStore {
    TokenStore::new(
        cache,
        TokenSettings::new("test-access-secret", ACCESS_TTL),
        TokenSettings::new("test-refresh-secret", REFRESH_TTL),
        clock,
    )
}

/// A service over a fresh database with one in-process cache tier.
pub async fn test_context() -> TestContext {
    let cache = Arc::new(MemoryCache::new(1_000));
    test_context_with_tokens(cache.clone(), test_tokens(cache)).await
}

pub async fn test_context_with_tokens(cache: Arc<MemoryCache>, tokens: TokenStore) -> TestContext {
    let db = test_database().await;

    let users: Arc<dyn UserStore> = Arc::new(CachedUserStore::new(
        Arc::new(SqlUserStore::new(db.clone())),
        cache.clone(),
        CACHE_TTL,
    ));
    let images: Arc<dyn ImageStore> = Arc::new(CachedImageStore::new(
        Arc::new(SqlImageStore::new(db)),
        cache.clone(),
        CACHE_TTL,
    ));
    let fetcher = Arc::new(HttpImageFetcher::new(Duration::from_secs(5)).unwrap());

    let service = Service::new(
        users.clone(),
        images.clone(),
        fetcher,
        tokens.clone(),
        PasswordCodec::new("test-pepper"),
    );

    TestContext {
        service,
        users,
        images,
        cache,
        tokens,
    }
}

/// Serves stand-in images on an ephemeral local port.
///
/// - `GET /img/{name}` answers with the bytes of `name`
/// - `GET /status/{code}` answers with that status
/// - `GET /slow` answers after two seconds
///
/// Returns the base URL, e.g. `http://127.0.0.1:40123`.
pub async fn serve_images() -> String {
    let app = Router::new()
        .route("/img/{name}", get(|Path(name): Path<String>| async move { name.into_bytes() }))
        .route(
            "/status/{code}",
            get(|Path(code): Path<u16>| async move {
                StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                "late"
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
