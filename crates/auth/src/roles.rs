use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use accessgate_core::RoleId;

use crate::Permission;

/// Role → permission expansion.
///
/// Roles are opaque ids at this layer; what they grant is owned by the caller's
/// policy source (often storage-backed).
pub trait RolePermissions: Send + Sync {
    /// Permissions granted by `role`. Unknown roles grant nothing.
    fn permissions_of(&self, role: &RoleId) -> Vec<Permission>;
}

impl<R> RolePermissions for Arc<R>
where
    R: RolePermissions + ?Sized,
{
    fn permissions_of(&self, role: &RoleId) -> Vec<Permission> {
        (**self).permissions_of(role)
    }
}

/// Role source for sessions that carry direct permissions only.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRoles;

impl RolePermissions for NoRoles {
    fn permissions_of(&self, _role: &RoleId) -> Vec<Permission> {
        Vec::new()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoleStoreError {
    #[error("role definitions lock poisoned")]
    LockPoisoned,
}

/// In-memory role definitions for tests/dev.
///
/// A poisoned lock fails closed: updates are rejected with an error and
/// lookups grant nothing.
#[derive(Debug, Default)]
pub struct InMemoryRolePermissions {
    inner: RwLock<HashMap<RoleId, Vec<Permission>>>,
}

impl InMemoryRolePermissions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `permission` to what `role` grants.
    pub fn grant(&self, role: RoleId, permission: Permission) -> Result<(), RoleStoreError> {
        let mut map = self.inner.write().map_err(|_| RoleStoreError::LockPoisoned)?;
        let perms = map.entry(role).or_default();
        if !perms.contains(&permission) {
            perms.push(permission);
        }
        Ok(())
    }

    /// Remove every grant of `role`.
    pub fn clear_role(&self, role: &RoleId) -> Result<(), RoleStoreError> {
        let mut map = self.inner.write().map_err(|_| RoleStoreError::LockPoisoned)?;
        map.remove(role);
        Ok(())
    }
}

impl RolePermissions for InMemoryRolePermissions {
    fn permissions_of(&self, role: &RoleId) -> Vec<Permission> {
        match self.inner.read() {
            Ok(map) => map.get(role).cloned().unwrap_or_default(),
            Err(_) => {
                tracing::warn!(%role, "role definitions lock poisoned; role grants nothing");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, Domain};

    #[test]
    fn unknown_role_grants_nothing() {
        let roles = InMemoryRolePermissions::new();
        assert!(roles.permissions_of(&RoleId::new()).is_empty());
        assert!(NoRoles.permissions_of(&RoleId::new()).is_empty());
    }

    #[test]
    fn grants_accumulate_without_duplicates() {
        let roles = InMemoryRolePermissions::new();
        let role = RoleId::new();
        let read = Permission::global(Domain::new("role"), Action::Read);
        let write = Permission::global(Domain::new("role"), Action::Write);

        roles.grant(role, read.clone()).unwrap();
        roles.grant(role, read.clone()).unwrap();
        roles.grant(role, write.clone()).unwrap();

        assert_eq!(roles.permissions_of(&role), vec![read, write]);

        roles.clear_role(&role).unwrap();
        assert!(roles.permissions_of(&role).is_empty());
    }

    #[test]
    fn poisoned_lock_rejects_updates_and_grants_nothing() {
        let roles = Arc::new(InMemoryRolePermissions::new());
        let role = RoleId::new();
        let read = Permission::global(Domain::new("role"), Action::Read);
        roles.grant(role, read.clone()).unwrap();

        let writer = roles.clone();
        let _ = std::thread::spawn(move || {
            let _guard = writer.inner.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert_eq!(roles.grant(role, read), Err(RoleStoreError::LockPoisoned));
        assert_eq!(roles.clear_role(&role), Err(RoleStoreError::LockPoisoned));
        assert!(roles.permissions_of(&role).is_empty());
    }
}
