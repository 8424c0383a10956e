//! Constants used throughout the library.
//!
//! Cache key prefixes and default lifetimes live here so the decorators,
//! the token store and the binary agree on them.

use std::time::Duration;

/// Separator between the parts of a cache key.
pub const KEY_SEPARATOR: &str = ":";

/// Cache key prefix for user records.
pub const USER_PREFIX: &str = "user";

/// Cache key prefix for image lists.
pub const IMAGES_PREFIX: &str = "images";

/// Cache key prefix for token identifiers.
pub const TOKEN_PREFIX: &str = "token";

/// Default port the server listens on.
pub const DEFAULT_PORT: u16 = 31001;

/// Default lifetime of an access token.
pub const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(15 * 60);

/// Default lifetime of a refresh token.
pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Default lifetime of entries in the shared cache tier.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Lifetime of entries in the in-process tier stacked over a shared cache.
pub const LOCAL_CACHE_TTL: Duration = Duration::from_secs(60);

/// Upper bound on the number of entries an in-process cache holds.
pub const MEMORY_CACHE_CAPACITY: u64 = 100_000;

/// Default timeout for downloading an image.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Name of the cookie and query parameter that may carry a bearer token.
pub const TOKEN_PARAM: &str = "jwt";
