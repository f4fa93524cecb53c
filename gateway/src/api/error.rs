//! HTTP mapping of the shared error taxonomy.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use error::{AppError, AuthError, ErrorResponse, MediaError};

/// Error returned by handlers and middleware.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl<E> From<E> for ApiError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AppError::Auth(e) => match e {
                AuthError::InvalidCredentials
                | AuthError::AccountDeactivated
                | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
                AuthError::Forbidden => StatusCode::FORBIDDEN,
                AuthError::UnknownRole(_) => StatusCode::BAD_REQUEST,
                AuthError::TokenCreationFailed => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Media(e) => match e {
                MediaError::NotFound => StatusCode::NOT_FOUND,
                MediaError::RangeNotSatisfiable { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
                MediaError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }

        let body = ErrorResponse::from(&self.0);
        let mut response = (status, Json(body)).into_response();
        let headers = response.headers_mut();

        match &self.0 {
            AppError::Auth(AuthError::InvalidToken) => {
                headers.insert(
                    header::WWW_AUTHENTICATE,
                    HeaderValue::from_static("Bearer error=\"invalid_token\""),
                );
            }
            AppError::Media(MediaError::RangeNotSatisfiable {
                length: Some(length),
            }) => {
                if let Ok(value) = HeaderValue::from_str(&format!("bytes */{length}")) {
                    headers.insert(header::CONTENT_RANGE, value);
                }
            }
            _ => {}
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_classes_have_distinct_statuses() {
        let statuses = [
            ApiError::from(AuthError::InvalidToken).status(),
            ApiError::from(AuthError::Forbidden).status(),
            ApiError::from(MediaError::RangeNotSatisfiable { length: Some(1) }).status(),
            ApiError::from(MediaError::NotFound).status(),
            ApiError::from(MediaError::Io(std::io::Error::new(std::io::ErrorKind::Other, "x")))
                .status(),
        ];
        assert_eq!(
            statuses,
            [
                StatusCode::UNAUTHORIZED,
                StatusCode::FORBIDDEN,
                StatusCode::RANGE_NOT_SATISFIABLE,
                StatusCode::NOT_FOUND,
                StatusCode::INTERNAL_SERVER_ERROR,
            ]
        );
    }

    #[test]
    fn test_unsatisfiable_range_carries_length() {
        let response =
            ApiError::from(MediaError::RangeNotSatisfiable { length: Some(42) }).into_response();
        assert_eq!(response.headers()[header::CONTENT_RANGE], "bytes */42");
    }

    #[test]
    fn test_invalid_token_challenges_bearer() {
        let response = ApiError::from(AuthError::InvalidToken).into_response();
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
    }
}
