//! The JSON envelope every API response is wrapped in, and the mapping from
//! library errors to HTTP statuses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::Error;

/// `{status, message, data}` as sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: u16,
    pub message: String,
    pub data: Option<T>,
}

/// Default message for a status: its reason phrase in lower case.
fn status_message(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_lowercase()
}

/// A successful response carrying `data`.
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 with `data`.
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data: Some(data),
        }
    }

    /// 201 with `data`.
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// A response with `data: null`.
    pub fn empty(status: StatusCode) -> Self {
        Self { status, data: None }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let envelope = Envelope {
            status: self.status.as_u16(),
            message: status_message(self.status),
            data: self.data,
        };
        (self.status, Json(envelope)).into_response()
    }
}

/// An error response. The message is what the client sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 400 for a body, path or query that could not be parsed.
    pub fn invalid_request() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid request format")
    }

    /// 404 with the default message.
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, status_message(StatusCode::NOT_FOUND))
    }

    /// 500 with a message that reveals nothing.
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = if err.is_authentication_error() {
            StatusCode::UNAUTHORIZED
        } else if err.is_not_found() {
            StatusCode::NOT_FOUND
        } else if err.is_conflict() || err.is_validation_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status != StatusCode::INTERNAL_SERVER_ERROR {
            return Self::new(status, err.to_string());
        }

        tracing::error!(module = err.module(), error = %err, "Request failed");
        let message = if err.is_database_error() {
            "internal database error"
        } else if err.is_cache_error() {
            "internal cache error"
        } else {
            "internal server error"
        };
        Self::new(status, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let envelope: Envelope<()> = Envelope {
            status: self.status.as_u16(),
            message: self.message,
            data: None,
        };
        (self.status, Json(envelope)).into_response()
    }
}
