use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use accessgate_core::ScopeId;

/// Resource category a permission applies to (e.g. `"role"`).
///
/// Domains are opaque strings. The wildcard domain `"*"` is meaningful only on
/// the granting side, where it matches every domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Domain(Cow<'static, str>);

impl Domain {
    pub const WILDCARD: Domain = Domain(Cow::Borrowed("*"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }

    /// Whether a grant on `self` covers a request on `requested`.
    pub fn covers(&self, requested: &Domain) -> bool {
        self.is_wildcard() || self == requested
    }
}

impl core::fmt::Display for Domain {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Operation kind a permission authorizes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Read,
    Write,
    Delete,
    Connect,
    Execute,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Write => "write",
            Action::Delete => "delete",
            Action::Connect => "connect",
            Action::Execute => "execute",
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `(domain, action, scope)` triple.
///
/// Used both as the thing a caller asks for and as the thing a principal is
/// granted. A `None` scope means "any scope": on a grant it is global, on a
/// request it asks for the global permission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    domain: Domain,
    action: Action,
    scope_id: Option<ScopeId>,
}

impl Permission {
    pub fn new(domain: Domain, action: Action, scope_id: Option<ScopeId>) -> Self {
        Self {
            domain,
            action,
            scope_id,
        }
    }

    /// Permission on `scope_id` only (and, when granted, its descendants).
    pub fn scoped(domain: Domain, action: Action, scope_id: ScopeId) -> Self {
        Self::new(domain, action, Some(scope_id))
    }

    /// Permission across all scopes.
    pub fn global(domain: Domain, action: Action) -> Self {
        Self::new(domain, action, None)
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn scope_id(&self) -> Option<ScopeId> {
        self.scope_id
    }

    /// `domain:action`, without the scope.
    ///
    /// This is the only rendering that may appear in errors returned to callers.
    pub fn unscoped_name(&self) -> String {
        format!("{}:{}", self.domain, self.action)
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.scope_id {
            Some(scope) => write!(f, "{}:{}@{}", self.domain, self.action, scope),
            None => write!(f, "{}:{}@*", self.domain, self.action),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn equality_is_by_value() {
        let scope = ScopeId::new();
        let a = Permission::scoped(Domain::new("role"), Action::Write, scope);
        let b = Permission::scoped(Domain::new(String::from("role")), Action::Write, scope);
        assert_eq!(a, b);

        let set: HashSet<Permission> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn scope_is_part_of_identity() {
        let a = Permission::scoped(Domain::new("role"), Action::Read, ScopeId::new());
        let b = Permission::scoped(Domain::new("role"), Action::Read, ScopeId::new());
        assert_ne!(a, b);
        assert_ne!(a, Permission::global(Domain::new("role"), Action::Read));
    }

    #[test]
    fn wildcard_domain_covers_everything() {
        assert!(Domain::WILDCARD.covers(&Domain::new("role")));
        assert!(Domain::new("role").covers(&Domain::new("role")));
        assert!(!Domain::new("role").covers(&Domain::new("user")));
        assert!(!Domain::new("role").covers(&Domain::WILDCARD));
    }

    #[test]
    fn display_forms() {
        let global = Permission::global(Domain::new("role"), Action::Delete);
        assert_eq!(global.to_string(), "role:delete@*");
        assert_eq!(global.unscoped_name(), "role:delete");

        let scope = ScopeId::new();
        let scoped = Permission::scoped(Domain::new("user"), Action::Read, scope);
        assert_eq!(scoped.to_string(), format!("user:read@{scope}"));
    }

    #[test]
    fn actions_serialize_in_snake_case() {
        let json = serde_json::to_string(&Action::Execute).unwrap();
        assert_eq!(json, "\"execute\"");
    }
}
