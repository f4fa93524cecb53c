//! Video catalog endpoints under `/api/videos`.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use catalog_service::{NewVideo, Video};
use error::AppError;

use super::media::serve_range;
use super::ApiError;
use crate::middleware::CurrentIdentity;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_videos))
        .route("/upload", post(upload_video))
        .route("/stream/:id", get(stream_video))
        .route("/:id", get(get_video))
}

async fn list_videos(
    State(state): State<AppState>,
    caller: CurrentIdentity,
) -> Result<Json<Vec<Video>>, ApiError> {
    let videos = state.catalog.list_videos(caller.is_admin()).await?;
    Ok(Json(videos))
}

async fn get_video(
    State(state): State<AppState>,
    caller: CurrentIdentity,
    Path(id): Path<i64>,
) -> Result<Json<Video>, ApiError> {
    visible_video(&state, &caller, id).await.map(Json)
}

/// Register metadata for a video file that is already in the store.
async fn upload_video(
    State(state): State<AppState>,
    Json(new): Json<NewVideo>,
) -> Result<(StatusCode, Json<Video>), ApiError> {
    if !state.videos.exists(&new.src_uuid).await? {
        return Err(AppError::NotFound(format!("video file not found: {}", new.src_uuid)).into());
    }
    let video = state.catalog.create_video(new).await?;
    Ok((StatusCode::CREATED, Json(video)))
}

async fn stream_video(
    State(state): State<AppState>,
    caller: CurrentIdentity,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let video = visible_video(&state, &caller, id).await?;
    serve_range(state.videos.as_ref(), &video.src_uuid, &headers, state.chunk_cap).await
}

/// Unpublished videos are reported as missing to non-admin callers.
async fn visible_video(
    state: &AppState,
    caller: &CurrentIdentity,
    id: i64,
) -> Result<Video, ApiError> {
    Ok(state.catalog.get_video(id, caller.is_admin()).await?)
}
