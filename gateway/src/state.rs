//! Shared application state.

use std::sync::Arc;

use auth::{Policy, TokenCodec};
use catalog_service::CatalogService;
use error::AuthError;

use crate::config::GatewayConfig;
use crate::media::{LocalFsMediaStore, MediaStore};

/// Everything handlers share. All of it is immutable after startup except the
/// catalog, which synchronizes internally.
#[derive(Clone)]
pub struct AppState {
    pub codec: Arc<TokenCodec>,
    pub policy: Arc<Policy>,
    pub catalog: Arc<CatalogService>,
    pub videos: Arc<dyn MediaStore>,
    pub images: Arc<dyn MediaStore>,
    pub chunk_cap: u64,
}

impl AppState {
    /// Build the state described by `config`.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, AuthError> {
        let codec = TokenCodec::new(config.jwt_config())?;
        Ok(Self {
            codec: Arc::new(codec),
            policy: Arc::new(Policy::media_catalog()),
            catalog: Arc::new(CatalogService::new()),
            videos: Arc::new(LocalFsMediaStore::new(&config.video_dir)),
            images: Arc::new(LocalFsMediaStore::new(&config.image_dir)),
            chunk_cap: config.chunk_cap_bytes,
        })
    }
}
