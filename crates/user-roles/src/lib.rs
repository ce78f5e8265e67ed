//! `accessgate-user-roles` — the association between a user and the roles it holds
//! within a scope, served through the permission gate.

pub mod kind;
pub mod model;
pub mod service;

pub use kind::{ROLE_DOMAIN, UserRolesKind};
pub use model::{NewUserRoles, UserRoles, UserRolesCreator, UserRolesQuery};
pub use service::{UserRolesService, UserRolesServiceExt, user_roles_service};
