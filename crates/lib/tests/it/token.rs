use std::sync::Arc;
use std::time::Duration;

use image_randomizer::{
    FixedClock,
    cache::{CacheStore, MemoryCache},
    service::Credentials,
    token::TokenKind,
};

use crate::helpers::*;

#[tokio::test]
async fn registered_tokens_validate() {
    let ctx = test_context().await;
    let pair = ctx
        .service
        .register(Credentials::new("alice", "secret"))
        .await
        .unwrap();

    let access = ctx
        .service
        .validate_token(TokenKind::Access, &pair.access_token)
        .await
        .unwrap();
    let refresh = ctx
        .service
        .validate_token(TokenKind::Refresh, &pair.refresh_token)
        .await
        .unwrap();
    assert_eq!(access.user_id, refresh.user_id);
}

#[tokio::test]
async fn refresh_token_is_not_an_access_token() {
    let ctx = test_context().await;
    let pair = ctx
        .service
        .register(Credentials::new("alice", "secret"))
        .await
        .unwrap();

    let err = ctx
        .service
        .validate_token(TokenKind::Access, &pair.refresh_token)
        .await
        .unwrap_err();
    assert!(err.is_authentication_error());
}

#[tokio::test]
async fn revoked_token_fails_even_with_valid_signature() {
    let ctx = test_context().await;
    let pair = ctx
        .service
        .register(Credentials::new("alice", "secret"))
        .await
        .unwrap();
    let claim = ctx
        .service
        .validate_token(TokenKind::Access, &pair.access_token)
        .await
        .unwrap();

    ctx.service
        .revoke_token(TokenKind::Access, &claim)
        .await
        .unwrap();

    // Signature and expiry still check out
    assert!(ctx.tokens.decode(TokenKind::Access, &pair.access_token).is_ok());

    let err = ctx
        .service
        .validate_token(TokenKind::Access, &pair.access_token)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid token or already expired");

    // The refresh token is independent
    assert!(
        ctx.service
            .validate_token(TokenKind::Refresh, &pair.refresh_token)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn identifier_owned_by_another_user_is_rejected() {
    let ctx = test_context().await;
    let pair = ctx
        .service
        .register(Credentials::new("alice", "secret"))
        .await
        .unwrap();
    let claim = ctx
        .service
        .validate_token(TokenKind::Access, &pair.access_token)
        .await
        .unwrap();

    let key = format!("token:{}", claim.access_uuid.as_deref().unwrap());
    ctx.cache
        .set(&key, (claim.user_id + 1).to_string(), Duration::from_secs(60))
        .await
        .unwrap();

    assert!(
        ctx.service
            .validate_token(TokenKind::Access, &pair.access_token)
            .await
            .unwrap_err()
            .is_authentication_error()
    );
}

#[tokio::test]
async fn expired_claim_is_rejected() {
    let cache = Arc::new(MemoryCache::new(100));
    let clock = Arc::new(FixedClock::default());
    let ctx = test_context_with_tokens(cache.clone(), test_tokens_with_clock(cache, clock.clone())).await;

    let pair = ctx
        .service
        .register(Credentials::new("alice", "secret"))
        .await
        .unwrap();

    // Past the access lifetime but well within the refresh lifetime
    clock.advance(ACCESS_TTL.as_millis() as u64 + 1_000);

    assert!(
        ctx.service
            .validate_token(TokenKind::Access, &pair.access_token)
            .await
            .is_err()
    );
    let refreshed = ctx
        .service
        .validate_token(TokenKind::Refresh, &pair.refresh_token)
        .await
        .unwrap();

    let new_pair = ctx
        .service
        .refresh_token(&refreshed, &pair.refresh_token)
        .await
        .unwrap();
    assert_eq!(new_pair.refresh_token, pair.refresh_token);
    assert_ne!(new_pair.access_token, pair.access_token);
    assert!(
        ctx.service
            .validate_token(TokenKind::Access, &new_pair.access_token)
            .await
            .is_ok()
    );
}
