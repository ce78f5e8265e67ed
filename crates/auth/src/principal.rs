use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use accessgate_core::{RoleId, ScopeId};

use crate::Permission;

/// Identity of an authenticated principal (human user, service account, etc).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(Uuid);

impl PrincipalId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PrincipalId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for PrincipalId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for PrincipalId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// The authenticated caller of one operation.
///
/// A session is built per request by whatever authenticated the caller and is
/// passed explicitly to every gated operation. It states the principal's home
/// scope and what it was granted: roles (expanded by the authorization service)
/// and permissions granted directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    principal_id: PrincipalId,
    scope_id: ScopeId,
    roles: Vec<RoleId>,
    permissions: Vec<Permission>,
}

impl Session {
    pub fn new(principal_id: PrincipalId, scope_id: ScopeId) -> Self {
        Self {
            principal_id,
            scope_id,
            roles: Vec::new(),
            permissions: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: RoleId) -> Self {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
        self
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        if !self.permissions.contains(&permission) {
            self.permissions.push(permission);
        }
        self
    }

    pub fn principal_id(&self) -> PrincipalId {
        self.principal_id
    }

    /// Scope the principal itself belongs to.
    pub fn scope_id(&self) -> ScopeId {
        self.scope_id
    }

    pub fn roles(&self) -> &[RoleId] {
        &self.roles
    }

    /// Permissions granted directly, not through a role.
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }
}
