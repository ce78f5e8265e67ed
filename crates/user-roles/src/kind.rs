use std::marker::PhantomData;

use accessgate_auth::Domain;
use accessgate_core::{Entity, EntityId, ListResult, Paging, ScopeId, ValidationResult, validate};
use accessgate_infra::{HasTable, StoreError};
use accessgate_service::{Audit, GatedEntity};

use crate::model::{NewUserRoles, UserRoles, UserRolesCreator, UserRolesQuery};

/// Permission domain guarding role assignments.
pub const ROLE_DOMAIN: &str = "role";

/// Gate hooks for user-role associations stored in any state holding a
/// `UserRoles` table.
#[derive(Debug)]
pub struct UserRolesKind<C> {
    _conn: PhantomData<fn() -> C>,
}

impl<C> UserRolesKind<C> {
    pub fn new() -> Self {
        Self { _conn: PhantomData }
    }
}

impl<C> Default for UserRolesKind<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> UserRolesKind<C>
where
    C: HasTable<UserRoles>,
{
    fn matching<'a>(
        conn: &'a C,
        scope_id: ScopeId,
        query: &'a UserRolesQuery,
    ) -> impl Iterator<Item = &'a UserRoles> + 'a {
        conn.table()
            .iter()
            .filter(move |row| row.scope_id() == scope_id && query.matches(row))
    }
}

impl<C> GatedEntity for UserRolesKind<C>
where
    C: HasTable<UserRoles>,
{
    type Entity = UserRoles;
    type Creator = UserRolesCreator;
    type Query = UserRolesQuery;
    type Draft = NewUserRoles;
    type Conn = C;

    const ENTITY_TYPE: &'static str = "userRoles";

    fn domain(&self) -> Domain {
        Domain::new(ROLE_DOMAIN)
    }

    fn validate_creator(&self, scope_id: ScopeId, creator: UserRolesCreator) -> ValidationResult<NewUserRoles> {
        let user_id = validate::not_null(creator.user_id, "creator.userId")?;
        let roles = validate::not_empty(creator.roles, "creator.roles")?;
        Ok(NewUserRoles {
            scope_id,
            user_id,
            roles,
        })
    }

    fn insert(&self, conn: &mut C, draft: NewUserRoles, audit: &Audit) -> Result<UserRoles, StoreError> {
        let row = UserRoles::from_draft(draft, audit.at, audit.principal_id);
        conn.table_mut().insert(row.clone())?;
        Ok(row)
    }

    fn find(&self, conn: &C, id: EntityId) -> Result<Option<UserRoles>, StoreError> {
        Ok(conn.table().get(id).cloned())
    }

    fn query(
        &self,
        conn: &C,
        scope_id: ScopeId,
        query: &UserRolesQuery,
        paging: Paging,
    ) -> Result<ListResult<UserRoles>, StoreError> {
        Ok(ListResult::paged(
            Self::matching(conn, scope_id, query).cloned(),
            paging,
        ))
    }

    fn count(&self, conn: &C, scope_id: ScopeId, query: &UserRolesQuery) -> Result<u64, StoreError> {
        Ok(Self::matching(conn, scope_id, query).count() as u64)
    }

    fn delete(&self, conn: &mut C, id: EntityId) -> Result<(), StoreError> {
        conn.table_mut().remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use accessgate_core::{RoleId, UserId, ValidationError};
    use accessgate_infra::InMemoryTable;

    use super::*;

    type Kind = UserRolesKind<InMemoryTable<UserRoles>>;

    #[test]
    fn user_is_mandatory() {
        let creator = UserRolesCreator::new(ScopeId::new()).with_role(RoleId::new());
        let err = Kind::new()
            .validate_creator(ScopeId::new(), creator)
            .unwrap_err();
        assert_eq!(err, ValidationError::null("creator.userId"));
    }

    #[test]
    fn roles_must_not_be_empty() {
        let creator = UserRolesCreator::new(ScopeId::new()).for_user(UserId::new());
        let err = Kind::new()
            .validate_creator(ScopeId::new(), creator)
            .unwrap_err();
        assert_eq!(err, ValidationError::empty("creator.roles"));
    }

    #[test]
    fn guarded_by_the_role_domain() {
        assert_eq!(Kind::new().domain(), Domain::new("role"));
        assert_eq!(Kind::ENTITY_TYPE, "userRoles");
    }
}
