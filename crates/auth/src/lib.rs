//! `accessgate-auth` — permission model and authorization decisions.
//!
//! This crate is intentionally decoupled from storage and transport.

pub mod authorize;
pub mod permissions;
pub mod principal;
pub mod roles;
pub mod scope;

pub use authorize::{
    AuthorizationExplanation, AuthorizationService, AuthzError, DenialKind, DenialReason,
    PrincipalState, RoleBasedAuthorizer,
};
pub use permissions::{Action, Domain, Permission};
pub use principal::{PrincipalId, Session};
pub use roles::{InMemoryRolePermissions, NoRoles, RolePermissions, RoleStoreError};
pub use scope::{FlatScopes, MAX_SCOPE_DEPTH, ScopeHierarchy, ScopeTree};
