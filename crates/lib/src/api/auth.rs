//! Bearer token extractors.
//!
//! A token is looked for in the `Authorization: Bearer` header, then the
//! `jwt` query parameter, then the `jwt` cookie. The first one found is the
//! only one checked.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::{HeaderMap, Uri};
use tower_cookies::Cookies;

use super::AppState;
use super::response::ApiError;
use crate::Error;
use crate::constants::TOKEN_PARAM;
use crate::token::{Claim, TokenError, TokenKind};

fn from_header(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}

fn from_query(uri: &Uri) -> Option<String> {
    url::form_urlencoded::parse(uri.query()?.as_bytes())
        .find(|(key, _)| key == TOKEN_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|token| !token.is_empty())
}

async fn from_cookie(parts: &mut Parts, state: &AppState) -> Option<String> {
    let cookies = Cookies::from_request_parts(parts, state).await.ok()?;
    cookies
        .get(TOKEN_PARAM)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

async fn find_token(parts: &mut Parts, state: &AppState) -> Option<String> {
    if let Some(token) = from_header(&parts.headers) {
        return Some(token);
    }
    if let Some(token) = from_query(&parts.uri) {
        return Some(token);
    }
    from_cookie(parts, state).await
}

async fn authenticate(
    parts: &mut Parts,
    state: &AppState,
    kind: TokenKind,
) -> Result<(Claim, String), ApiError> {
    let token = find_token(parts, state)
        .await
        .ok_or_else(|| ApiError::from(Error::from(TokenError::MissingToken)))?;
    let claim = state.service.validate_token(kind, &token).await?;
    Ok((claim, token))
}

/// A validated access token's claim.
#[derive(Debug, Clone)]
pub struct AccessClaim(pub Claim);

impl FromRequestParts<AppState> for AccessClaim {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let (claim, _) = authenticate(parts, state, TokenKind::Access).await?;
        Ok(AccessClaim(claim))
    }
}

/// A validated refresh token's claim, with the token as presented.
#[derive(Debug, Clone)]
pub struct RefreshClaim {
    pub claim: Claim,
    pub token: String,
}

impl FromRequestParts<AppState> for RefreshClaim {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let (claim, token) = authenticate(parts, state, TokenKind::Refresh).await?;
        Ok(RefreshClaim { claim, token })
    }
}
