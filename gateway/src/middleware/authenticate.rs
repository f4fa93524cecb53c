//! Authentication gate.

use auth::Identity;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use error::AuthError;

use crate::api::ApiError;
use crate::state::AppState;

/// Extract the bearer token from the `Authorization` header.
///
/// `Ok(None)` means no bearer credential was presented at all (no header, or
/// a different scheme). A bearer header that cannot carry a token is an error,
/// never anonymous.
pub fn bearer_credential(headers: &HeaderMap) -> Result<Option<&str>, AuthError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AuthError::InvalidToken)?.trim();

    let (scheme, token) = value
        .split_once(|c: char| c.is_ascii_whitespace())
        .unwrap_or((value, ""));
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Ok(None);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::InvalidToken);
    }
    Ok(Some(token))
}

/// Resolve the caller's [`Identity`] and attach it to the request.
///
/// A present but invalid token ends the request with 401 here, whatever the
/// target path; only an absent credential continues as anonymous.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = match bearer_credential(req.headers()) {
        Ok(None) => Identity::Anonymous,
        Ok(Some(token)) => match state.codec.verify(token) {
            Ok(principal) => Identity::Authenticated(principal),
            Err(err) => {
                tracing::warn!(path = %req.uri().path(), "Rejected bearer token");
                return Err(err.into());
            }
        },
        Err(err) => {
            tracing::warn!(path = %req.uri().path(), "Malformed Authorization header");
            return Err(err.into());
        }
    };

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_absent_header_is_anonymous() {
        assert_eq!(bearer_credential(&HeaderMap::new()), Ok(None));
    }

    #[test]
    fn test_other_schemes_are_not_bearer_credentials() {
        assert_eq!(bearer_credential(&headers("Basic dXNlcjpwYXNz")), Ok(None));
    }

    #[test]
    fn test_bearer_token_is_extracted() {
        assert_eq!(bearer_credential(&headers("Bearer abc.def.ghi")), Ok(Some("abc.def.ghi")));
        assert_eq!(bearer_credential(&headers("bearer  abc")), Ok(Some("abc")));
        assert_eq!(bearer_credential(&headers("Bearer\tabc")), Ok(Some("abc")));
    }

    #[test]
    fn test_tab_separated_garbage_is_still_a_bearer_credential() {
        assert_eq!(bearer_credential(&headers("Bearer\tgarbage")), Ok(Some("garbage")));
        assert_eq!(bearer_credential(&headers("Bearer\t")), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_empty_bearer_is_invalid() {
        assert_eq!(bearer_credential(&headers("Bearer")), Err(AuthError::InvalidToken));
        assert_eq!(bearer_credential(&headers("Bearer   ")), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_non_ascii_header_is_invalid() {
        let mut map = HeaderMap::new();
        map.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap(),
        );
        assert_eq!(bearer_credential(&map), Err(AuthError::InvalidToken));
    }
}
