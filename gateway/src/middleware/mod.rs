//! Request-boundary middleware
//!
//! Every request passes [`authenticate`] and then [`authorize`] before any
//! handler runs. Handlers learn who is calling through [`CurrentIdentity`].

mod authenticate;
mod authorize;
mod identity;

pub use authenticate::{authenticate, bearer_credential};
pub use authorize::authorize;
pub use identity::CurrentIdentity;
