//! Policy enforcement ahead of handlers.

use auth::Identity;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::api::ApiError;
use crate::state::AppState;

/// Check the resolved identity against the authorization table. Runs after
/// [`super::authenticate`]; a request it never saw counts as anonymous.
pub async fn authorize(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = req.extensions().get::<Identity>().cloned().unwrap_or_default();
    state.policy.check(&identity, req.uri().path())?;
    Ok(next.run(req).await)
}
