use axum::Json;
use axum::body::Body;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use super::AppState;
use super::auth::AccessClaim;
use super::response::{ApiError, ApiResponse};
use crate::image::Image;

/// Body of image create and update requests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageRequest {
    #[serde(default)]
    pub image: String,
}

fn image_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::invalid_request())
}

/// Handler for GET /images - list the caller's images
pub(super) async fn list(
    State(state): State<AppState>,
    AccessClaim(claim): AccessClaim,
) -> Result<ApiResponse<Vec<Image>>, ApiError> {
    let images = state.service.get_images(&claim).await?;
    Ok(ApiResponse::ok(images))
}

/// Handler for POST /images - add an image URL
pub(super) async fn create(
    State(state): State<AppState>,
    AccessClaim(claim): AccessClaim,
    payload: Result<Json<ImageRequest>, JsonRejection>,
) -> Result<ApiResponse<Image>, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::invalid_request())?;
    let image = state.service.create_image(&claim, &request.image).await?;
    Ok(ApiResponse::created(image))
}

/// Handler for PATCH /images/{id} - replace an image URL
pub(super) async fn update(
    State(state): State<AppState>,
    AccessClaim(claim): AccessClaim,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ImageRequest>, JsonRejection>,
) -> Result<ApiResponse<Image>, ApiError> {
    let id = image_id(path)?;
    let Json(request) = payload.map_err(|_| ApiError::invalid_request())?;
    let image = state.service.update_image(&claim, id, &request.image).await?;
    Ok(ApiResponse::ok(image))
}

/// Handler for DELETE /images/{id} - remove an image
pub(super) async fn delete(
    State(state): State<AppState>,
    AccessClaim(claim): AccessClaim,
    path: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<()>, ApiError> {
    let id = image_id(path)?;
    state.service.delete_image(&claim, id).await?;
    Ok(ApiResponse::empty(StatusCode::OK))
}

/// Handler for GET /user/{username}/image.jpg - stream a random image
pub(super) async fn random(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(username) = path.map_err(|_| ApiError::invalid_request())?;
    let body = state.service.random_image(&username).await?;

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("image/jpeg"));
    if let Some(len) = body.content_length {
        headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
    }
    Ok((headers, Body::from_stream(body.into_stream())).into_response())
}
