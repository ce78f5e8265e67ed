use accessgate_auth::{AuthorizationService, Session};
use accessgate_core::{ScopeId, UserId};
use accessgate_infra::{GateConfig, HasTable, TransactionalStore};
use accessgate_service::{EntityService, GatedRepository, ServiceResult};

use crate::kind::UserRolesKind;
use crate::model::{UserRoles, UserRolesQuery};

/// User-role associations behind the permission gate.
pub type UserRolesService<A, S> = GatedRepository<UserRolesKind<<S as TransactionalStore>::Conn>, A, S>;

pub fn user_roles_service<A, S>(authz: A, store: S, config: GateConfig) -> UserRolesService<A, S>
where
    A: AuthorizationService,
    S: TransactionalStore,
    S::Conn: HasTable<UserRoles>,
{
    GatedRepository::with_config(UserRolesKind::new(), authz, store, config)
}

/// Lookups layered on top of the gated operations.
pub trait UserRolesServiceExt {
    /// The association of `user_id` in `scope_id`, when exactly one exists.
    ///
    /// Runs as a regular `query`, so it requires `read` on the scope. Zero or
    /// several matches both yield `None`.
    fn find_by_user_id(
        &self,
        session: &Session,
        scope_id: ScopeId,
        user_id: UserId,
    ) -> ServiceResult<Option<UserRoles>>;
}

impl<T> UserRolesServiceExt for T
where
    T: EntityService<Entity = UserRoles, Query = UserRolesQuery> + ?Sized,
{
    fn find_by_user_id(
        &self,
        session: &Session,
        scope_id: ScopeId,
        user_id: UserId,
    ) -> ServiceResult<Option<UserRoles>> {
        let query = UserRolesQuery::new(scope_id).by_user(user_id);
        let result = self.query(session, &query)?;
        if result.limit_exceeded() || result.size() != 1 {
            return Ok(None);
        }
        Ok(result.into_items().pop())
    }
}
