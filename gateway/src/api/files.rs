//! Raw file endpoints under `/api/files`.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::routing::get;
use axum::Router;

use super::media::{serve_full, serve_range};
use super::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/video/:filename", get(get_video_file))
        .route("/image/:filename", get(get_image_file))
}

/// Range-served video bytes.
async fn get_video_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    serve_range(state.videos.as_ref(), &filename, &headers, state.chunk_cap).await
}

/// Whole poster image.
async fn get_image_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    serve_full(state.images.as_ref(), &filename).await
}
