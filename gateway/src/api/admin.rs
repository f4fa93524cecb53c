//! Admin endpoints under `/api/admin`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use catalog_service::CatalogStats;
use serde::Deserialize;

use super::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/users/:email/active", put(set_account_active))
}

#[derive(Debug, Deserialize)]
pub struct AccountActiveRequest {
    pub active: bool,
}

async fn stats(State(state): State<AppState>) -> Result<Json<CatalogStats>, ApiError> {
    Ok(Json(state.catalog.stats().await?))
}

/// Suspend or reinstate an account. A suspended account cannot log in;
/// tokens it already holds stay valid until they expire.
async fn set_account_active(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(req): Json<AccountActiveRequest>,
) -> Result<StatusCode, ApiError> {
    state.catalog.set_active(&email, req.active).await?;
    tracing::info!(email = %email, active = req.active, "Account activation changed");
    Ok(StatusCode::NO_CONTENT)
}
