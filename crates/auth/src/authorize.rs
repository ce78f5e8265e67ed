use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use accessgate_core::{RoleId, ScopeId};

use crate::{Permission, PrincipalId, RolePermissions, ScopeHierarchy, Session};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// The session holds no grant covering the requested permission.
    ///
    /// Carries `domain:action` only; the scope is deliberately left out so a
    /// denial reads the same whether or not the scope exists.
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

impl AuthzError {
    pub fn forbidden(permission: &Permission) -> Self {
        Self::Forbidden(permission.unscoped_name())
    }
}

/// The single enforcement point for protected operations.
///
/// Implementations answer synchronously and must not cache decisions across
/// calls: a grant revoked between two calls is observed by the second one.
pub trait AuthorizationService: Send + Sync {
    fn check_permission(&self, session: &Session, permission: &Permission) -> Result<(), AuthzError>;
}

impl<A> AuthorizationService for Arc<A>
where
    A: AuthorizationService + ?Sized,
{
    fn check_permission(&self, session: &Session, permission: &Permission) -> Result<(), AuthzError> {
        (**self).check_permission(session, permission)
    }
}

/// Resolves a session's grants through its roles and the scope hierarchy.
///
/// A grant covers a request when:
/// - its domain equals the requested one (or is the `"*"` wildcard),
/// - its action equals the requested one, and
/// - it is global, or its scope is the requested scope or an ancestor of it.
///
/// A request for the global permission (no scope) is covered by global grants only.
#[derive(Debug, Clone)]
pub struct RoleBasedAuthorizer<R, H> {
    roles: R,
    scopes: H,
}

impl<R, H> RoleBasedAuthorizer<R, H>
where
    R: RolePermissions,
    H: ScopeHierarchy,
{
    pub fn new(roles: R, scopes: H) -> Self {
        Self { roles, scopes }
    }

    /// Direct grants followed by role grants, without duplicates.
    pub fn effective_grants(&self, session: &Session) -> Vec<Permission> {
        let mut grants: Vec<Permission> = session.permissions().to_vec();
        for role in session.roles() {
            for perm in self.roles.permissions_of(role) {
                if !grants.contains(&perm) {
                    grants.push(perm);
                }
            }
        }
        grants
    }

    fn covers(&self, grant: &Permission, required: &Permission) -> bool {
        if !grant.domain().covers(required.domain()) || grant.action() != required.action() {
            return false;
        }
        match (grant.scope_id(), required.scope_id()) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(granted), Some(requested)) => self.scopes.is_ancestor_or_self(granted, requested),
        }
    }

    fn matching_grant(&self, session: &Session, required: &Permission) -> Option<Permission> {
        self.effective_grants(session)
            .into_iter()
            .find(|grant| self.covers(grant, required))
    }

    /// Explain why a permission check would succeed or fail.
    ///
    /// Meant for audit trails and operator debugging; the explanation includes
    /// scope ids and must not be handed back to the caller being checked.
    pub fn explain(&self, session: &Session, required: &Permission) -> AuthorizationExplanation {
        let grants = self.effective_grants(session);
        let principal = PrincipalState {
            principal_id: session.principal_id(),
            scope_id: session.scope_id(),
            roles: session.roles().to_vec(),
            effective_permissions: grants.iter().map(|p| p.to_string()).collect(),
            has_wildcard: grants.iter().any(|p| p.domain().is_wildcard()),
        };

        if let Some(grant) = grants.iter().find(|grant| self.covers(grant, required)) {
            let reason = if grant.domain().is_wildcard() {
                format!("Principal holds wildcard grant '{grant}'")
            } else if grant.scope_id() == required.scope_id() {
                format!("Principal holds '{grant}'")
            } else {
                format!("Principal holds '{grant}', which covers '{required}'")
            };
            return AuthorizationExplanation {
                required_permission: required.to_string(),
                granted: true,
                reason,
                matched_grant: Some(grant.to_string()),
                principal,
                denial_reason: None,
            };
        }

        // Same domain/action granted somewhere else: the scope is what's missing.
        let elsewhere: Vec<String> = grants
            .iter()
            .filter(|g| g.domain().covers(required.domain()) && g.action() == required.action())
            .map(|g| g.to_string())
            .collect();

        let denial_reason = if elsewhere.is_empty() {
            DenialReason {
                kind: DenialKind::MissingPermission,
                message: format!("Missing required permission: '{}'", required.unscoped_name()),
                suggestions: vec![
                    format!("Assign a role that grants '{}'", required.unscoped_name()),
                    format!("Grant '{required}' directly to the principal"),
                ],
            }
        } else {
            DenialReason {
                kind: DenialKind::ScopeNotCovered,
                message: format!(
                    "'{}' is granted only on scopes that do not contain the requested one: {:?}",
                    required.unscoped_name(),
                    elsewhere
                ),
                suggestions: vec![
                    format!("Grant '{required}' on the requested scope or one of its ancestors"),
                    "Check that the scope hierarchy places the requested scope under the granted one"
                        .to_string(),
                ],
            }
        };

        AuthorizationExplanation {
            required_permission: required.to_string(),
            granted: false,
            reason: denial_reason.message.clone(),
            matched_grant: None,
            principal,
            denial_reason: Some(denial_reason),
        }
    }
}

impl<R, H> AuthorizationService for RoleBasedAuthorizer<R, H>
where
    R: RolePermissions,
    H: ScopeHierarchy,
{
    fn check_permission(&self, session: &Session, permission: &Permission) -> Result<(), AuthzError> {
        match self.matching_grant(session, permission) {
            Some(grant) => {
                tracing::trace!(
                    principal = %session.principal_id(),
                    required = %permission,
                    grant = %grant,
                    "permission granted"
                );
                Ok(())
            }
            None => {
                tracing::warn!(
                    principal = %session.principal_id(),
                    required = %permission,
                    "permission denied"
                );
                Err(AuthzError::forbidden(permission))
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an authorization decision.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    /// The permission that was being checked.
    pub required_permission: String,

    /// Whether the authorization was granted.
    pub granted: bool,

    /// Human-readable reason for the decision.
    pub reason: String,

    /// The grant that covered the request, when granted.
    pub matched_grant: Option<String>,

    /// Details about the principal's state.
    pub principal: PrincipalState,

    /// If denied, this explains what was missing.
    pub denial_reason: Option<DenialReason>,
}

/// Current state of the principal being checked.
#[derive(Debug, Clone, Serialize)]
pub struct PrincipalState {
    pub principal_id: PrincipalId,
    pub scope_id: ScopeId,
    pub roles: Vec<RoleId>,
    pub effective_permissions: Vec<String>,
    pub has_wildcard: bool,
}

/// Detailed reason why authorization was denied.
#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    /// No grant for the domain/action at all.
    MissingPermission,
    /// The domain/action is granted, but not on a covering scope.
    ScopeNotCovered,
}
