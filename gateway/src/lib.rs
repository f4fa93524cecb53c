//! Media catalog HTTP gateway
//!
//! Exposes the router and its building blocks as a library so that tests can
//! drive the whole application in-process.

pub mod api;
pub mod config;
pub mod media;
pub mod middleware;
pub mod router;
pub mod state;

pub use config::GatewayConfig;
pub use router::build_router;
pub use state::AppState;
