/*! Integration tests for the image randomizer.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - user: SQL and cached user stores
 * - image: SQL and cached image stores, tier stacking
 * - token: token lifecycle as seen through the service
 * - service: registration, login and random selection
 * - api: the HTTP router end to end
 * - cache: shared cache backends (Redis only when TEST_REDIS_URL is set)
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("image_randomizer=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod api;
mod helpers;
mod token;
mod user;
