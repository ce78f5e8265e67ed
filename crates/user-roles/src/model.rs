use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use accessgate_auth::PrincipalId;
use accessgate_core::{Entity, EntityId, Paging, RoleId, ScopeId, ScopedCreator, ScopedQuery, UserId};

// ─────────────────────────────────────────────────────────────────────────────
// Entity
// ─────────────────────────────────────────────────────────────────────────────

/// The roles assigned to one user within one scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRoles {
    id: EntityId,
    scope_id: ScopeId,
    user_id: UserId,
    roles: BTreeSet<RoleId>,
    created_on: DateTime<Utc>,
    created_by: PrincipalId,
}

impl UserRoles {
    pub(crate) fn from_draft(draft: NewUserRoles, created_on: DateTime<Utc>, created_by: PrincipalId) -> Self {
        Self {
            id: EntityId::new(),
            scope_id: draft.scope_id,
            user_id: draft.user_id,
            roles: draft.roles,
            created_on,
            created_by,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn roles(&self) -> &BTreeSet<RoleId> {
        &self.roles
    }

    pub fn has_role(&self, role: &RoleId) -> bool {
        self.roles.contains(role)
    }

    pub fn created_on(&self) -> DateTime<Utc> {
        self.created_on
    }

    pub fn created_by(&self) -> PrincipalId {
        self.created_by
    }
}

impl Entity for UserRoles {
    fn id(&self) -> EntityId {
        self.id
    }

    fn scope_id(&self) -> ScopeId {
        self.scope_id
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Creator
// ─────────────────────────────────────────────────────────────────────────────

/// Request to assign roles to a user.
///
/// `user_id` is mandatory and `roles` must not be empty; both are checked by
/// the gate before any permission check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRolesCreator {
    pub scope_id: Option<ScopeId>,
    pub user_id: Option<UserId>,
    pub roles: BTreeSet<RoleId>,
}

impl UserRolesCreator {
    pub fn new(scope_id: ScopeId) -> Self {
        Self {
            scope_id: Some(scope_id),
            ..Self::default()
        }
    }

    pub fn for_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_role(mut self, role: RoleId) -> Self {
        self.roles.insert(role);
        self
    }
}

impl ScopedCreator for UserRolesCreator {
    fn scope_id(&self) -> Option<ScopeId> {
        self.scope_id
    }
}

/// A creator that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRoles {
    pub scope_id: ScopeId,
    pub user_id: UserId,
    pub roles: BTreeSet<RoleId>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Query
// ─────────────────────────────────────────────────────────────────────────────

/// Filter over the associations of one scope.
///
/// Predicates are combined with AND; an unset predicate matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRolesQuery {
    pub scope_id: Option<ScopeId>,
    pub user_id: Option<UserId>,
    pub role_id: Option<RoleId>,
    pub paging: Paging,
}

impl UserRolesQuery {
    pub fn new(scope_id: ScopeId) -> Self {
        Self {
            scope_id: Some(scope_id),
            ..Self::default()
        }
    }

    pub fn by_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_role(mut self, role_id: RoleId) -> Self {
        self.role_id = Some(role_id);
        self
    }

    pub fn paged(mut self, offset: u64, limit: Option<u64>) -> Self {
        self.paging = Paging::new(offset, limit);
        self
    }

    /// Whether `row` satisfies the predicates (scope filtering is the caller's).
    pub fn matches(&self, row: &UserRoles) -> bool {
        self.user_id.is_none_or(|user| row.user_id == user)
            && self.role_id.is_none_or(|role| row.roles.contains(&role))
    }
}

impl ScopedQuery for UserRolesQuery {
    fn scope_id(&self) -> Option<ScopeId> {
        self.scope_id
    }

    fn paging(&self) -> Paging {
        self.paging
    }
}
