//! Path-based authorization policy.
//!
//! The policy is an ordered list of [`Rule`]s built once at startup. Lookups
//! walk the list top-down and stop at the first matching pattern, so specific
//! patterns must be registered before broader ones. Paths no rule matches
//! require an authenticated identity of any role.

use error::AuthError;

use crate::claims::Role;
use crate::identity::Identity;

/// A request path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Matches exactly one path.
    Exact(String),
    /// `/base/**`: matches `/base` and everything below it.
    Prefix(String),
}

impl PathPattern {
    /// Parse a pattern. A trailing `/**` makes it a prefix pattern.
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix("/**") {
            Some(base) => Self::Prefix(base.trim_end_matches('/').to_string()),
            None => Self::Exact(pattern.to_string()),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(exact) => path == exact,
            Self::Prefix(base) => match path.strip_prefix(base.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
        }
    }
}

/// What a matching rule demands of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone, including anonymous callers.
    Public,
    /// An authenticated caller holding exactly this role.
    Role(Role),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub pattern: PathPattern,
    pub access: Access,
}

impl Rule {
    pub fn new(pattern: &str, access: Access) -> Self {
        Self {
            pattern: PathPattern::parse(pattern),
            access,
        }
    }
}

/// Immutable authorization table.
#[derive(Debug, Clone, Default)]
pub struct Policy {
    rules: Vec<Rule>,
}

impl Policy {
    /// An empty policy: every path needs an authenticated caller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a public rule.
    pub fn permit_all(mut self, pattern: &str) -> Self {
        self.rules.push(Rule::new(pattern, Access::Public));
        self
    }

    /// Append a rule requiring `role`.
    pub fn require_role(mut self, pattern: &str, role: Role) -> Self {
        self.rules.push(Rule::new(pattern, Access::Role(role)));
        self
    }

    /// The media catalog's table.
    pub fn media_catalog() -> Self {
        Self::new()
            .permit_all("/api/auth/**")
            .permit_all("/api/files/image/**")
            .require_role("/api/videos/upload", Role::Admin)
            .require_role("/api/admin/**", Role::Admin)
    }

    /// First rule whose pattern matches `path`.
    pub fn rule_for(&self, path: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.pattern.matches(path))
    }

    /// Decide whether `identity` may reach `path`.
    pub fn check(&self, identity: &Identity, path: &str) -> Result<(), AuthError> {
        let allowed = match self.rule_for(path).map(|rule| rule.access) {
            Some(Access::Public) => true,
            Some(Access::Role(required)) => identity.role() == Some(required),
            None => !identity.is_anonymous(),
        };

        if allowed {
            Ok(())
        } else {
            tracing::warn!(
                path,
                role = identity.role().map(|r| r.as_str()).unwrap_or("ANONYMOUS"),
                "Access denied"
            );
            Err(AuthError::Forbidden)
        }
    }
}
