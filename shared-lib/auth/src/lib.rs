//! Authentication and authorization library for the media catalog.
//!
//! This crate provides the signed bearer token codec, the request identity
//! type, and the static path-based authorization policy.

mod claims;
mod codec;
mod identity;
mod policy;

pub use claims::{Claims, Role};
pub use codec::{JwtConfig, TokenCodec, DEFAULT_TOKEN_VALIDITY_SECS};
pub use identity::{Identity, Principal};
pub use policy::{Access, PathPattern, Policy, Rule};
