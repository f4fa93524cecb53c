//! Gateway configuration.

use std::path::PathBuf;

use auth::{JwtConfig, DEFAULT_TOKEN_VALIDITY_SECS};
use serde::{Deserialize, Serialize};

use crate::media::DEFAULT_CHUNK_CAP;

/// Gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// HTTP listen address
    pub http_addr: String,

    /// HMAC secret for bearer tokens; `None` means a per-process random secret
    #[serde(skip_serializing)]
    pub jwt_secret: Option<String>,

    /// Issuer embedded in and required of every token
    pub jwt_issuer: String,

    /// Token validity window in seconds
    pub jwt_expires_in_secs: i64,

    /// Root directory of the video file store
    pub video_dir: PathBuf,

    /// Root directory of the poster image store
    pub image_dir: PathBuf,

    /// Upper bound on the bytes served by one range request
    pub chunk_cap_bytes: u64,

    /// Bootstrap admin account, created at startup when both are set
    pub admin_email: Option<String>,
    #[serde(skip_serializing)]
    pub admin_password: Option<String>,

    /// Service version
    pub version: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:8080".to_string(),
            jwt_secret: None,
            jwt_issuer: "media-catalog".to_string(),
            jwt_expires_in_secs: DEFAULT_TOKEN_VALIDITY_SECS,
            video_dir: PathBuf::from("./uploads/videos"),
            image_dir: PathBuf::from("./uploads/images"),
            chunk_cap_bytes: DEFAULT_CHUNK_CAP,
            admin_email: None,
            admin_password: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl GatewayConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("HTTP_ADDR") {
            config.http_addr = addr;
        }

        if let Ok(secret) = std::env::var("JWT_SECRET") {
            if !secret.is_empty() {
                config.jwt_secret = Some(secret);
            }
        }

        if let Ok(issuer) = std::env::var("JWT_ISSUER") {
            config.jwt_issuer = issuer;
        }

        if let Ok(expires) = std::env::var("JWT_EXPIRES_IN_SECS") {
            match expires.parse::<i64>() {
                Ok(n) if n > 0 => config.jwt_expires_in_secs = n,
                _ => tracing::warn!("Ignoring invalid JWT_EXPIRES_IN_SECS: {}", expires),
            }
        }

        if let Ok(path) = std::env::var("VIDEO_DIR") {
            config.video_dir = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("IMAGE_DIR") {
            config.image_dir = PathBuf::from(path);
        }

        if let Ok(cap) = std::env::var("MEDIA_CHUNK_CAP_BYTES") {
            match cap.parse::<u64>() {
                Ok(n) if n > 0 => config.chunk_cap_bytes = n,
                _ => tracing::warn!("Ignoring invalid MEDIA_CHUNK_CAP_BYTES: {}", cap),
            }
        }

        config.admin_email = std::env::var("ADMIN_EMAIL").ok().filter(|s| !s.is_empty());
        config.admin_password = std::env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty());

        config
    }

    /// Token settings. Without a configured secret a random one is used, so
    /// tokens do not survive a restart.
    pub fn jwt_config(&self) -> JwtConfig {
        let secret = match &self.jwt_secret {
            Some(secret) => secret.clone(),
            None => {
                tracing::warn!("JWT_SECRET is not set; using a random per-process secret");
                format!(
                    "{}{}",
                    uuid::Uuid::new_v4().simple(),
                    uuid::Uuid::new_v4().simple()
                )
            }
        };
        JwtConfig::new(secret, self.jwt_issuer.clone(), self.jwt_expires_in_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.http_addr, "0.0.0.0:8080");
        assert_eq!(config.chunk_cap_bytes, 1_048_576);
        assert_eq!(config.jwt_expires_in_secs, 864_000);
        assert!(config.jwt_secret.is_none());
    }

    #[test]
    fn test_random_secret_when_unset() {
        let config = GatewayConfig::default();
        let a = config.jwt_config();
        let b = config.jwt_config();
        assert!(!a.secret.is_empty());
        assert_ne!(a.secret, b.secret);
    }

    #[test]
    fn test_configured_secret_is_used() {
        let config = GatewayConfig {
            jwt_secret: Some("s3cret".to_string()),
            ..GatewayConfig::default()
        };
        assert_eq!(config.jwt_config().secret, "s3cret");
    }
}
