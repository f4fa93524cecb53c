//! JWT claims and role definitions.

use std::fmt;
use std::str::FromStr;

use error::AuthError;
use serde::{Deserialize, Serialize};

/// User roles in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Regular user
    User,
    /// Administrator with full access
    Admin,
}

impl Role {
    /// Wire representation used inside tokens and API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            other => Err(AuthError::UnknownRole(other.to_string())),
        }
    }
}

/// JWT claims structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account email)
    pub sub: String,
    /// Account role
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl Claims {
    /// Create claims with an explicit issue instant.
    pub fn issued_at(
        subject: impl Into<String>,
        role: Role,
        issuer: impl Into<String>,
        now: i64,
        expires_in_secs: i64,
    ) -> Self {
        Self {
            sub: subject.into(),
            role,
            exp: now.saturating_add(expires_in_secs),
            iat: now,
            iss: issuer.into(),
        }
    }

    /// A token is dead from the instant of expiry onward.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }
}
