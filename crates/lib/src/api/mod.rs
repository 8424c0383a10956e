//! HTTP surface of the service.
//!
//! | Method | Path | Auth |
//! |---|---|---|
//! | POST | /register, /login | none |
//! | POST | /token/check, /token/revoke | access |
//! | POST | /token/refresh | refresh |
//! | GET, POST | /images | access |
//! | PATCH, DELETE | /images/{id} | access |
//! | GET | /user/{username}/image.jpg | none |
//! | GET | /ping, /health | none |
//!
//! Every JSON response is an [`Envelope`]. Unknown routes get a 404
//! envelope, panics a 500 envelope, and requests slower than the configured
//! timeout a 408 envelope.

mod auth;
mod image;
mod response;
mod token;
mod user;

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_cookies::CookieManagerLayer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub use auth::{AccessClaim, RefreshClaim};
pub use image::ImageRequest;
pub use response::{ApiError, ApiResponse, Envelope};
pub use token::TokenCheck;

use crate::service::Service;

/// Shared state of every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<Service>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(service: Service, request_timeout: Duration) -> Self {
        Self {
            service: Arc::new(service),
            request_timeout,
        }
    }
}

/// Body of GET /health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Build the router with all routes and middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/health", get(health))
        .route("/register", post(user::register))
        .route("/login", post(user::login))
        .route("/token/check", post(token::check))
        .route("/token/refresh", post(token::refresh))
        .route("/token/revoke", post(token::revoke))
        .route("/images", get(image::list).post(image::create))
        .route("/images/{id}", patch(image::update).delete(image::delete))
        .route("/user/{username}/image.jpg", get(image::random))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), enforce_timeout))
        .layer(CookieManagerLayer::new())
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handler for GET /ping - liveness probe
async fn ping() -> ApiResponse<&'static str> {
    ApiResponse::ok("pong")
}

/// Handler for GET /health - health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

async fn not_found() -> ApiError {
    ApiError::not_found()
}

async fn enforce_timeout(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    match tokio::time::timeout(state.request_timeout, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(path, timeout = ?state.request_timeout, "Request timed out");
            ApiError::new(StatusCode::REQUEST_TIMEOUT, "request timeout").into_response()
        }
    }
}

/// Turn a handler panic into a 500 envelope.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");
    ApiError::internal().into_response()
}
