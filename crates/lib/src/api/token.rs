use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use super::AppState;
use super::auth::{AccessClaim, RefreshClaim};
use super::response::{ApiError, ApiResponse};
use crate::service::TokenPair;
use crate::token::TokenKind;

/// What a client learns from a valid access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCheck {
    pub user_id: i64,
}

/// Handler for POST /token/check - report whose access token this is
pub(super) async fn check(AccessClaim(claim): AccessClaim) -> ApiResponse<TokenCheck> {
    ApiResponse::ok(TokenCheck {
        user_id: claim.user_id,
    })
}

/// Handler for POST /token/refresh - issue a new access token
pub(super) async fn refresh(
    State(state): State<AppState>,
    RefreshClaim { claim, token }: RefreshClaim,
) -> Result<ApiResponse<TokenPair>, ApiError> {
    let pair = state.service.refresh_token(&claim, &token).await?;
    Ok(ApiResponse::ok(pair))
}

/// Handler for POST /token/revoke - invalidate the presented access token
pub(super) async fn revoke(
    State(state): State<AppState>,
    AccessClaim(claim): AccessClaim,
) -> Result<ApiResponse<()>, ApiError> {
    state.service.revoke_token(TokenKind::Access, &claim).await?;
    Ok(ApiResponse::empty(StatusCode::OK))
}
