//! Serve command - runs the image randomizer HTTP server.

use std::{sync::Arc, time::Duration};

use tokio::signal::unix::{SignalKind, signal};

use image_randomizer::{
    SystemClock,
    api::{self, AppState},
    cache::CacheStore,
    image::{CachedImageStore, HttpImageFetcher, ImageStore, SqlImageStore},
    service::Service,
    token::{TokenSettings, TokenStore},
    user::{CachedUserStore, PasswordCodec, SqlUserStore, UserStore},
};

use crate::backend::{CacheTiers, create_caches, create_database};
use crate::cli::ServeArgs;

/// Reject configurations the server cannot run with.
fn validate(args: &ServeArgs) -> Result<(), String> {
    if args.access_secret.is_empty() || args.refresh_secret.is_empty() {
        return Err("access and refresh secrets must not be empty".to_string());
    }
    if args.access_secret == args.refresh_secret {
        return Err("access and refresh secrets must differ".to_string());
    }
    if args.pepper.is_empty() {
        return Err("password pepper must not be empty".to_string());
    }

    let lifetimes = [
        ("access-ttl", args.access_ttl),
        ("refresh-ttl", args.refresh_ttl),
        ("cache-ttl", args.cache_ttl),
        ("local-cache-ttl", args.local_cache_ttl),
        ("request-timeout", args.request_timeout),
        ("fetch-timeout", args.fetch_timeout),
    ];
    for (name, seconds) in lifetimes {
        if seconds == 0 {
            return Err(format!("--{name} must be greater than zero"));
        }
    }
    Ok(())
}

/// Wrap the SQL stores in every read-through tier, innermost last in `tiers`.
fn layer_stores(
    users: Arc<dyn UserStore>,
    images: Arc<dyn ImageStore>,
    caches: &CacheTiers,
) -> (Arc<dyn UserStore>, Arc<dyn ImageStore>) {
    let mut users = users;
    let mut images = images;
    for (cache, ttl) in caches.tiers.iter().rev() {
        users = Arc::new(CachedUserStore::new(users, cache.clone(), *ttl));
        images = Arc::new(CachedImageStore::new(images, cache.clone(), *ttl));
    }
    (users, images)
}

/// Run the image randomizer server
pub async fn run(args: &ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    validate(args)?;

    let db = create_database(&args.database).await?;
    let caches = create_caches(args).await?;

    let (users, images) = layer_stores(
        Arc::new(SqlUserStore::new(db.clone())),
        Arc::new(SqlImageStore::new(db.clone())),
        &caches,
    );
    let tokens_cache: Arc<dyn CacheStore> = caches.tokens.clone();
    let tokens = TokenStore::new(
        tokens_cache,
        TokenSettings::new(&args.access_secret, Duration::from_secs(args.access_ttl)),
        TokenSettings::new(&args.refresh_secret, Duration::from_secs(args.refresh_ttl)),
        Arc::new(SystemClock),
    );
    let fetcher = Arc::new(HttpImageFetcher::new(Duration::from_secs(
        args.fetch_timeout,
    ))?);

    let service = Service::new(
        users,
        images,
        fetcher,
        tokens,
        PasswordCodec::new(args.pepper.as_str()),
    );
    let state = AppState::new(service, Duration::from_secs(args.request_timeout));
    let app = api::router(state);

    // Bind server
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        %local_addr,
        backend = db.kind().as_str(),
        cache = ?args.cache,
        "Image randomizer listening"
    );
    println!("Image Randomizer listening on http://{local_addr}");
    println!("Press Ctrl+C to shutdown");

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("Received SIGTERM, initiating graceful shutdown..."),
                _ = sigint.recv() => tracing::info!("Received SIGINT, initiating graceful shutdown..."),
            }
        })
        .await?;

    db.close().await;
    println!("Server shut down");
    Ok(())
}
