use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use super::AppState;
use super::response::{ApiError, ApiResponse};
use crate::service::{Credentials, TokenPair};

/// Handler for POST /register - create an account and return a token pair
pub(super) async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<ApiResponse<TokenPair>, ApiError> {
    let Json(credentials) = payload.map_err(|_| ApiError::invalid_request())?;
    let pair = state.service.register(credentials).await?;
    Ok(ApiResponse::created(pair))
}

/// Handler for POST /login - exchange credentials for a token pair
pub(super) async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<ApiResponse<TokenPair>, ApiError> {
    let Json(credentials) = payload.map_err(|_| ApiError::invalid_request())?;
    let pair = state.service.login(credentials).await?;
    Ok(ApiResponse::ok(pair))
}
