//! HTTP handlers
//!
//! Each submodule owns one URL prefix. Handlers never check roles themselves;
//! the policy layer has already run by the time they are called.

pub mod admin;
pub mod auth;
mod error;
pub mod files;
mod media;
pub mod users;
pub mod videos;

pub use error::ApiError;

use serde::Serialize;

/// Plain acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
