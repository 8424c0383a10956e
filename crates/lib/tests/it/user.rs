use std::sync::Arc;

use image_randomizer::{
    Error,
    cache::{CacheStore, MemoryCache},
    user::{CachedUserStore, NewUser, SqlUserStore, UserError, UserStore},
};

use crate::helpers::*;

fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        password_salt: "c2FsdHNhbHRzYWx0".to_string(),
    }
}

#[tokio::test]
async fn create_assigns_ids_and_get_finds_user() {
    let store = SqlUserStore::new(test_database().await);

    let alice = store.create(new_user("alice")).await.unwrap();
    let bob = store.create(new_user("bob")).await.unwrap();
    assert_ne!(alice.id, bob.id);

    let found = store.get_by_username("alice").await.unwrap();
    assert_eq!(found, alice);
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let store = SqlUserStore::new(test_database().await);
    let first = store.create(new_user("alice")).await.unwrap();

    let err = store.create(new_user("alice")).await.unwrap_err();
    assert!(err.is_conflict());
    assert!(matches!(
        err,
        Error::User(UserError::UsernameAlreadyExists { ref username }) if username == "alice"
    ));

    // The original row is untouched
    assert_eq!(store.get_by_username("alice").await.unwrap().id, first.id);
}

#[tokio::test]
async fn missing_user_is_not_found() {
    let store = SqlUserStore::new(test_database().await);
    let err = store.get_by_username("nobody").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "user not found");
}

#[tokio::test]
async fn cached_store_serves_repeat_lookups_from_cache() {
    let db = test_database().await;
    let sql = Arc::new(SqlUserStore::new(db.clone()));
    let cache = Arc::new(MemoryCache::new(100));
    let store = CachedUserStore::new(sql, cache.clone(), CACHE_TTL);

    let alice = store.create(new_user("alice")).await.unwrap();
    assert_eq!(store.get_by_username("alice").await.unwrap(), alice);
    assert!(cache.get("user:username:alice").await.unwrap().is_some());

    // Remove the row behind the cache's back; the cached copy still answers
    sqlx::query("DELETE FROM users")
        .execute(db.pool())
        .await
        .unwrap();
    assert_eq!(store.get_by_username("alice").await.unwrap(), alice);
}
