//! Catalog Service
//!
//! This crate provides account and video catalog management.
//! The gateway calls it in-process; it never sees HTTP or tokens, only the
//! subject string of the identity the gateway resolved.

pub mod models;
pub mod password;
pub mod repository;
pub mod service;

pub use models::{Account, CatalogStats, NewVideo, Video};
pub use repository::{CatalogRepository, InMemoryRepository, RepositoryError};
pub use service::{CatalogService, ServiceError};
