//! Per-caller endpoints under `/api/users`.
//!
//! Every operation here is keyed on the resolved identity's subject, never on
//! an identifier taken from the request.

use ::auth::Role;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use catalog_service::Video;
use serde::{Deserialize, Serialize};

use super::{ApiError, MessageResponse};
use crate::middleware::CurrentIdentity;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/change-password", post(change_password))
        .route("/watchlist", get(watchlist))
        .route(
            "/watchlist/:video_id",
            post(add_to_watchlist).delete(remove_from_watchlist),
        )
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

async fn me(caller: CurrentIdentity) -> Result<Json<MeResponse>, ApiError> {
    let principal = caller.principal()?;
    Ok(Json(MeResponse {
        email: principal.subject.clone(),
        role: principal.role,
    }))
}

async fn change_password(
    State(state): State<AppState>,
    caller: CurrentIdentity,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let principal = caller.principal()?;
    state
        .catalog
        .change_password(&principal.subject, &req.current_password, &req.new_password)
        .await?;
    Ok(Json(MessageResponse::new("Password changed successfully")))
}

async fn watchlist(
    State(state): State<AppState>,
    caller: CurrentIdentity,
) -> Result<Json<Vec<Video>>, ApiError> {
    let principal = caller.principal()?;
    Ok(Json(
        state
            .catalog
            .watchlist(&principal.subject, caller.is_admin())
            .await?,
    ))
}

async fn add_to_watchlist(
    State(state): State<AppState>,
    caller: CurrentIdentity,
    Path(video_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let principal = caller.principal()?;
    state
        .catalog
        .add_to_watchlist(&principal.subject, video_id, caller.is_admin())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_from_watchlist(
    State(state): State<AppState>,
    caller: CurrentIdentity,
    Path(video_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let principal = caller.principal()?;
    state
        .catalog
        .remove_from_watchlist(&principal.subject, video_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
