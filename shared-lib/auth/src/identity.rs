//! Request-scoped identity.

use crate::claims::Role;

/// An authenticated account as established from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Stable account identifier (the account email)
    pub subject: String,
    pub role: Role,
}

/// Who is making the current request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Identity {
    /// No credential was presented.
    #[default]
    Anonymous,
    Authenticated(Principal),
}

impl Identity {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(principal) => Some(principal),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.principal().map(|p| p.role)
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }
}

impl From<Principal> for Identity {
    fn from(principal: Principal) -> Self {
        Self::Authenticated(principal)
    }
}
