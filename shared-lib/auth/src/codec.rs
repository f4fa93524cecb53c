//! Signed bearer token encoding and verification.

use std::collections::BTreeMap;
use std::fmt;

use error::AuthError;
use hmac::{Hmac, Mac};
use jwt::{SignWithKey, VerifyWithKey};
use sha2::Sha256;

use crate::claims::{Claims, Role};
use crate::identity::Principal;

type HmacSha256 = Hmac<Sha256>;

/// Ten days.
pub const DEFAULT_TOKEN_VALIDITY_SECS: i64 = 864_000;

/// JWT configuration.
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token issuer
    pub issuer: String,
    /// Token validity duration in seconds
    pub expires_in_secs: i64,
}

impl JwtConfig {
    /// Create a new JWT configuration.
    pub fn new(secret: impl Into<String>, issuer: impl Into<String>, expires_in_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            expires_in_secs,
        }
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("expires_in_secs", &self.expires_in_secs)
            .finish()
    }
}

/// Issues and verifies identity tokens.
///
/// The signing key is derived once from [`JwtConfig`] and never changes, so a
/// single codec can be shared (behind an `Arc`) by every request handler.
#[derive(Clone)]
pub struct TokenCodec {
    key: HmacSha256,
    issuer: String,
    expires_in_secs: i64,
}

impl TokenCodec {
    /// Build a codec from configuration. An empty secret is rejected.
    pub fn new(config: JwtConfig) -> Result<Self, AuthError> {
        if config.secret.is_empty() {
            tracing::error!("JWT secret must not be empty");
            return Err(AuthError::TokenCreationFailed);
        }

        let key = HmacSha256::new_from_slice(config.secret.as_bytes()).map_err(|e| {
            tracing::error!("Failed to create HMAC key: {}", e);
            AuthError::TokenCreationFailed
        })?;

        Ok(Self {
            key,
            issuer: config.issuer,
            expires_in_secs: config.expires_in_secs,
        })
    }

    /// Issue a token for `subject` valid from now.
    pub fn issue(&self, subject: &str, role: Role) -> Result<String, AuthError> {
        self.issue_at(subject, role, chrono::Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, subject: &str, role: Role, now: i64) -> Result<String, AuthError> {
        let claims = Claims::issued_at(subject, role, self.issuer.as_str(), now, self.expires_in_secs);
        self.encode(&claims)
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// Every failure, whether a bad signature, a malformed payload, a foreign
    /// issuer or expiry, is reported as [`AuthError::InvalidToken`].
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Principal, AuthError> {
        let claims = self.decode(token)?;

        if claims.is_expired_at(now) {
            tracing::debug!("Rejecting token: expired");
            return Err(AuthError::InvalidToken);
        }

        Ok(Principal {
            subject: claims.sub,
            role: claims.role,
        })
    }

    fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        let mut token_claims: BTreeMap<String, serde_json::Value> = BTreeMap::new();
        token_claims.insert("sub".to_string(), serde_json::json!(claims.sub));
        token_claims.insert("role".to_string(), serde_json::json!(claims.role.as_str()));
        token_claims.insert("exp".to_string(), serde_json::json!(claims.exp));
        token_claims.insert("iat".to_string(), serde_json::json!(claims.iat));
        token_claims.insert("iss".to_string(), serde_json::json!(claims.iss));

        token_claims.sign_with_key(&self.key).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            AuthError::TokenCreationFailed
        })
    }

    fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let token_claims: BTreeMap<String, serde_json::Value> =
            token.verify_with_key(&self.key).map_err(|e| {
                tracing::debug!("Rejecting token: {}", e);
                AuthError::InvalidToken
            })?;

        let sub = token_claims
            .get("sub")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::InvalidToken)?
            .to_string();

        let role: Role = token_claims
            .get("role")
            .and_then(|v| v.as_str())
            .ok_or(AuthError::InvalidToken)?
            .parse()
            .map_err(|_| AuthError::InvalidToken)?;

        let exp = token_claims
            .get("exp")
            .and_then(|v| v.as_i64())
            .ok_or(AuthError::InvalidToken)?;

        let iat = token_claims
            .get("iat")
            .and_then(|v| v.as_i64())
            .ok_or(AuthError::InvalidToken)?;

        let iss = token_claims
            .get("iss")
            .and_then(|v| v.as_str())
            .ok_or(AuthError::InvalidToken)?
            .to_string();

        if iss != self.issuer {
            tracing::debug!("Rejecting token: foreign issuer");
            return Err(AuthError::InvalidToken);
        }

        Ok(Claims { sub, role, exp, iat, iss })
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("issuer", &self.issuer)
            .field("expires_in_secs", &self.expires_in_secs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn codec() -> TokenCodec {
        TokenCodec::new(JwtConfig::new("test-secret-key", "test-issuer", DEFAULT_TOKEN_VALIDITY_SECS))
            .unwrap()
    }

    const BASE64URL: &[u8; 64] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

    /// Flip the lowest bit of the first base64url symbol of the signature.
    fn flip_signature_bit(token: &str) -> String {
        let sig_start = token.rfind('.').unwrap() + 1;
        let mut bytes = token.as_bytes().to_vec();
        let index = BASE64URL.iter().position(|&c| c == bytes[sig_start]).unwrap();
        bytes[sig_start] = BASE64URL[index ^ 1];
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_issue_then_verify_round_trip() {
        let codec = codec();
        for role in [Role::User, Role::Admin] {
            let token = codec.issue_at("user@example.com", role, NOW).unwrap();
            let principal = codec.verify_at(&token, NOW).unwrap();
            assert_eq!(principal.subject, "user@example.com");
            assert_eq!(principal.role, role);
        }
    }

    #[test]
    fn test_verify_with_wall_clock() {
        let codec = codec();
        let token = codec.issue("user@example.com", Role::User).unwrap();
        assert!(codec.verify(&token).is_ok());
    }

    #[test]
    fn test_expiry_instant_is_exclusive() {
        let codec = codec();
        let token = codec.issue_at("user@example.com", Role::User, NOW).unwrap();
        let expires_at = NOW + DEFAULT_TOKEN_VALIDITY_SECS;

        assert!(codec.verify_at(&token, expires_at - 1).is_ok());
        assert_eq!(codec.verify_at(&token, expires_at), Err(AuthError::InvalidToken));
        assert_eq!(codec.verify_at(&token, expires_at + 1), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let codec = codec();
        let token = codec.issue_at("user@example.com", Role::User, NOW).unwrap();
        let tampered = flip_signature_bit(&token);
        assert_ne!(tampered, token);
        assert_eq!(codec.verify_at(&tampered, NOW), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_expired_and_forged_tokens_fail_identically() {
        let codec = codec();
        let token = codec.issue_at("user@example.com", Role::User, NOW).unwrap();
        let expired = codec.verify_at(&token, NOW + DEFAULT_TOKEN_VALIDITY_SECS);
        let forged = codec.verify_at(&flip_signature_bit(&token), NOW);
        assert_eq!(expired, forged);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = codec().issue_at("user@example.com", Role::Admin, NOW).unwrap();
        let other = TokenCodec::new(JwtConfig::new("another-secret", "test-issuer", 60)).unwrap();
        assert_eq!(other.verify_at(&token, NOW), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_wrong_issuer_is_rejected() {
        let token = codec().issue_at("user@example.com", Role::User, NOW).unwrap();
        let other =
            TokenCodec::new(JwtConfig::new("test-secret-key", "someone-else", 60)).unwrap();
        assert_eq!(other.verify_at(&token, NOW), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let codec = codec();
        for token in ["", "not-a-token", "a.b.c", "eyJhbGciOiJIUzI1NiJ9..", "...."] {
            assert_eq!(codec.verify_at(token, NOW), Err(AuthError::InvalidToken), "{token:?}");
        }
    }

    #[test]
    fn test_empty_secret_is_refused() {
        let result = TokenCodec::new(JwtConfig::new("", "test-issuer", 60));
        assert!(matches!(result, Err(AuthError::TokenCreationFailed)));
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let config = JwtConfig::new("super-secret", "test-issuer", 60);
        assert!(!format!("{config:?}").contains("super-secret"));
        let codec = TokenCodec::new(config).unwrap();
        assert!(!format!("{codec:?}").contains("super-secret"));
    }
}
