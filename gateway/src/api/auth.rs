//! Account endpoints under `/api/auth`. All public.

use std::str::FromStr;

use ::auth::Role;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use error::AuthError;
use serde::{Deserialize, Serialize};

use super::{ApiError, MessageResponse};
use crate::middleware::CurrentIdentity;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/health", get(health))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

/// Create an account. Only an admin caller may create another admin.
async fn register(
    State(state): State<AppState>,
    caller: CurrentIdentity,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let role = match req.role.as_deref() {
        Some(role) => Role::from_str(role)?,
        None => Role::User,
    };
    if role == Role::Admin && !caller.is_admin() {
        tracing::warn!(email = %req.email, "Admin registration refused for non-admin caller");
        return Err(AuthError::Forbidden.into());
    }

    state
        .catalog
        .register(&req.email, &req.full_name, &req.password, role)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let account = state.catalog.authenticate(&req.email, &req.password).await?;
    let token = state.codec.issue(&account.email, account.role)?;
    tracing::info!(email = %account.email, "Login succeeded");

    Ok(Json(LoginResponse {
        token,
        email: account.email,
        full_name: account.full_name,
        role: account.role,
    }))
}

async fn health() -> Json<MessageResponse> {
    Json(MessageResponse::new("Auth service is running"))
}
