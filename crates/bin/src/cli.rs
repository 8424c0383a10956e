//! CLI argument definitions for the image randomizer binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use image_randomizer::constants::{
    DEFAULT_ACCESS_TTL, DEFAULT_CACHE_TTL, DEFAULT_FETCH_TIMEOUT, DEFAULT_PORT,
    DEFAULT_REFRESH_TTL, LOCAL_CACHE_TTL,
};
use image_randomizer::db::DEFAULT_MAX_CONNECTIONS;

/// Storage backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// SQLite database file in the data directory (default)
    Sqlite,
    /// PostgreSQL database (for multi-instance deployments)
    Postgres,
}

/// Shared cache tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheDialect {
    /// No shared cache; tokens are still kept in process memory
    Nocache,
    /// Process-local cache (default)
    Inmemory,
    /// Redis, shared between server processes
    Redis,
}

/// Serve a random image from each user's list of image URLs
#[derive(Parser, Debug)]
#[command(name = "image-randomizer")]
#[command(about = "Image Randomizer - one URL, a different picture every time")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Create the database schema, then exit
    Migrate(DatabaseArgs),
    /// Check health of a running server
    Health(HealthArgs),
}

/// Database connection configuration shared by commands that open storage
#[derive(clap::Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Storage backend to use
    #[arg(short, long, default_value = "sqlite", env = "IR_DB_BACKEND")]
    pub backend: Backend,

    /// Data directory for storage files.
    /// For SQLite: stores image-randomizer.db
    #[arg(short = 'D', long, env = "IR_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// PostgreSQL connection URL (required when backend=postgres)
    #[arg(long, env = "IR_POSTGRES_URL")]
    pub postgres_url: Option<String>,

    /// Upper bound on pooled database connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS, env = "IR_DB_MAX_CONNECTIONS")]
    pub db_max_connections: u32,
}

/// Arguments for the serve command
#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "IR_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(long, default_value = "0.0.0.0", env = "IR_HOST")]
    pub host: String,

    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Shared cache tier
    #[arg(long = "cache", default_value = "inmemory", env = "IR_CACHE_DIALECT")]
    pub cache: CacheDialect,

    /// Redis connection URL (required when cache=redis)
    #[arg(long, env = "IR_CACHE_ADDRESS")]
    pub redis_url: Option<String>,

    /// Lifetime of shared cache entries, in seconds
    #[arg(long, default_value_t = DEFAULT_CACHE_TTL.as_secs(), env = "IR_CACHE_TIME")]
    pub cache_ttl: u64,

    /// Lifetime of process-local entries in front of Redis, in seconds
    #[arg(long, default_value_t = LOCAL_CACHE_TTL.as_secs(), env = "IR_LOCAL_CACHE_TIME")]
    pub local_cache_ttl: u64,

    /// Secret for signing access tokens
    #[arg(long, env = "IR_JWT_ACCESS_SECRET", hide_env_values = true)]
    pub access_secret: String,

    /// Access token lifetime, in seconds
    #[arg(long, default_value_t = DEFAULT_ACCESS_TTL.as_secs(), env = "IR_JWT_ACCESS_EXPIRED")]
    pub access_ttl: u64,

    /// Secret for signing refresh tokens
    #[arg(long, env = "IR_JWT_REFRESH_SECRET", hide_env_values = true)]
    pub refresh_secret: String,

    /// Refresh token lifetime, in seconds
    #[arg(long, default_value_t = DEFAULT_REFRESH_TTL.as_secs(), env = "IR_JWT_REFRESH_EXPIRED")]
    pub refresh_ttl: u64,

    /// Application-wide secret mixed into every password hash
    #[arg(long, env = "IR_PASSWORD_PEPPER", hide_env_values = true)]
    pub pepper: String,

    /// Per-request deadline, in seconds
    #[arg(long, default_value_t = 30, env = "IR_REQUEST_TIMEOUT")]
    pub request_timeout: u64,

    /// Deadline for downloading a remote image, in seconds
    #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT.as_secs(), env = "IR_FETCH_TIMEOUT")]
    pub fetch_timeout: u64,
}

/// Arguments for the health command
#[derive(clap::Args, Debug)]
pub struct HealthArgs {
    /// Base URL of the server to check (overrides host and port)
    #[arg(long)]
    pub url: Option<String>,

    /// Port of the server to check
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "IR_PORT")]
    pub port: u16,

    /// Host of the server to check
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Timeout in seconds
    #[arg(short, long, default_value_t = 5)]
    pub timeout: u64,
}
