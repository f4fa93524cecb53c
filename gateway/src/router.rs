//! Route table and middleware wiring.

use axum::middleware::from_fn_with_state;
use axum::Router;

use crate::api;
use crate::middleware::{authenticate, authorize};
use crate::state::AppState;

/// Build the HTTP application.
///
/// Layers wrap outside-in, so `authenticate` runs first and `authorize`
/// second. Both see every request, including those no route matches.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/auth", api::auth::routes())
        .nest("/api/videos", api::videos::routes())
        .nest("/api/files", api::files::routes())
        .nest("/api/users", api::users::routes())
        .nest("/api/admin", api::admin::routes())
        .layer(from_fn_with_state(state.clone(), authorize))
        .layer(from_fn_with_state(state.clone(), authenticate))
        .with_state(state)
}
