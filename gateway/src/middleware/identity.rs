use auth::{Identity, Principal};
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use error::{AppError, AuthError};

use crate::api::ApiError;

/// The identity the authentication gate resolved for this request.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

impl CurrentIdentity {
    /// The authenticated caller, or 403 for anonymous requests.
    pub fn principal(&self) -> Result<&Principal, ApiError> {
        self.0.principal().ok_or_else(|| AuthError::Forbidden.into())
    }

    pub fn is_admin(&self) -> bool {
        self.0.role() == Some(auth::Role::Admin)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentIdentity)
            .ok_or_else(|| AppError::Internal("authentication gate not installed".to_string()).into())
    }
}
