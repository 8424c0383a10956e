//! Access and refresh tokens.
//!
//! A token is an HS256 JWT carrying an opaque identifier. The identifier is
//! also written to a [`CacheStore`] under `token:<identifier>` with the
//! token's lifetime, mapping it to the owning user id. The cache entry is
//! the source of truth: a token whose signature still verifies is invalid
//! once its entry expired or was revoked.
//!
//! Access and refresh tokens are signed with different secrets and carry
//! their identifier in different claims (`access_uuid` / `refresh_uuid`),
//! so one kind never decodes as the other.

mod errors;

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub use errors::TokenError;

use crate::Result;
use crate::cache::{CacheStore, cache_key};
use crate::clock::Clock;
use crate::constants::TOKEN_PREFIX;

/// Which of the two token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Secret and lifetime for one token kind.
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub ttl: Duration,
}

impl TokenSettings {
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// The claims embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub authorized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_uuid: Option<String>,
    pub user_id: i64,
    pub iat: i64,
    pub exp: i64,
}

impl Claim {
    /// The identifier this claim carries for `kind`, if any.
    pub fn identifier(&self, kind: TokenKind) -> Option<&str> {
        match kind {
            TokenKind::Access => self.access_uuid.as_deref(),
            TokenKind::Refresh => self.refresh_uuid.as_deref(),
        }
    }
}

/// A freshly issued token and the identifier stored for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub identifier: String,
    pub token: String,
}

fn token_key(identifier: &str) -> String {
    cache_key(&[TOKEN_PREFIX, identifier])
}

/// Issues, validates and revokes tokens.
#[derive(Clone)]
pub struct TokenStore {
    cache: Arc<dyn CacheStore>,
    access: TokenSettings,
    refresh: TokenSettings,
    clock: Arc<dyn Clock>,
}

impl TokenStore {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        access: TokenSettings,
        refresh: TokenSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cache,
            access,
            refresh,
            clock,
        }
    }

    fn settings(&self, kind: TokenKind) -> &TokenSettings {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    /// Issue an access token for `user_id`.
    pub async fn issue_access(&self, user_id: i64) -> Result<IssuedToken> {
        self.issue(TokenKind::Access, user_id).await
    }

    /// Issue a refresh token for `user_id`.
    pub async fn issue_refresh(&self, user_id: i64) -> Result<IssuedToken> {
        self.issue(TokenKind::Refresh, user_id).await
    }

    async fn issue(&self, kind: TokenKind, user_id: i64) -> Result<IssuedToken> {
        let settings = self.settings(kind);
        let identifier = uuid::Uuid::new_v4().simple().to_string();
        let iat = self.clock.now_secs();
        let exp = iat + settings.ttl.as_secs() as i64;

        let (access_uuid, refresh_uuid) = match kind {
            TokenKind::Access => (Some(identifier.clone()), None),
            TokenKind::Refresh => (None, Some(identifier.clone())),
        };
        let claim = Claim {
            authorized: true,
            access_uuid,
            refresh_uuid,
            user_id,
            iat,
            exp,
        };

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claim,
            &EncodingKey::from_secret(settings.secret.as_bytes()),
        )
        .map_err(|source| TokenError::SigningFailed {
            reason: format!("{kind:?} token"),
            source,
        })?;

        self.cache
            .set(&token_key(&identifier), user_id.to_string(), settings.ttl)
            .await?;

        Ok(IssuedToken { identifier, token })
    }

    /// Look up the user id an identifier belongs to.
    ///
    /// `None` means the identifier expired, was revoked, or never existed.
    pub async fn validate(&self, identifier: &str) -> Result<Option<i64>> {
        let key = token_key(identifier);
        let Some(raw) = self.cache.get(&key).await? else {
            return Ok(None);
        };

        match raw.parse::<i64>() {
            Ok(user_id) => Ok(Some(user_id)),
            Err(_) => {
                tracing::warn!(key, "Token entry does not hold a user id");
                Ok(None)
            }
        }
    }

    /// Delete an identifier so its token stops validating.
    pub async fn revoke(&self, identifier: &str) -> Result<()> {
        self.cache.delete(&token_key(identifier)).await
    }

    /// Verify a token's signature and expiry for `kind` and return its claim.
    ///
    /// Only HS256 is accepted. Expiry is judged by this store's clock. This
    /// does not consult the identifier store; see [`TokenStore::validate`].
    pub fn decode(&self, kind: TokenKind, token: &str) -> Result<Claim> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = jsonwebtoken::decode::<Claim>(
            token,
            &DecodingKey::from_secret(self.settings(kind).secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected {kind:?} token");
            TokenError::InvalidToken
        })?;

        let claim = data.claims;
        if claim.exp <= self.clock.now_secs() {
            return Err(TokenError::InvalidToken.into());
        }
        if claim.identifier(kind).is_none() {
            return Err(TokenError::InvalidToken.into());
        }
        Ok(claim)
    }
}
