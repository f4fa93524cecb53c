//! Response builders shared by the media endpoints.

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use error::AppError;

use super::ApiError;
use crate::media::{open_full, open_window, MediaFile, MediaStore, MediaWindow};

/// Serve the window of `id` selected by the request's `Range` header.
pub async fn serve_range(
    store: &dyn MediaStore,
    id: &str,
    headers: &HeaderMap,
    cap: u64,
) -> Result<Response, ApiError> {
    // A Range header that is not valid text cannot name a satisfiable window.
    let range = match headers.get(header::RANGE) {
        Some(value) => Some(value.to_str().unwrap_or("")),
        None => None,
    };
    let window = open_window(store, id, range, cap).await?;
    partial_content(window)
}

/// Serve `id` in full.
pub async fn serve_full(store: &dyn MediaStore, id: &str) -> Result<Response, ApiError> {
    let file = open_full(store, id).await?;
    full_content(file)
}

fn partial_content(media: MediaWindow) -> Result<Response, ApiError> {
    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, media.content_type)
        .header(header::CONTENT_LENGTH, media.window.len())
        .header(header::CONTENT_RANGE, media.window.content_range())
        .header(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"))
        .body(Body::from_stream(media.body))
        .map_err(|e| AppError::Internal(format!("failed to build response: {e}")).into())
}

fn full_content(media: MediaFile) -> Result<Response, ApiError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, media.content_type)
        .header(header::CONTENT_LENGTH, media.length)
        .body(Body::from_stream(media.body))
        .map_err(|e| AppError::Internal(format!("failed to build response: {e}")).into())
}
