//! Scope-aware entity, creator and query shapes.

use crate::id::{EntityId, ScopeId};
use crate::query::Paging;

/// A persisted entity: identity plus the scope it lives in.
pub trait Entity {
    /// Identifier generated by the persistence layer.
    fn id(&self) -> EntityId;

    /// Scope the entity belongs to (tenant partition and permission scope).
    fn scope_id(&self) -> ScopeId;
}

/// Input for creating an entity.
///
/// The scope is optional at the type level because creators arrive from callers
/// that may omit it; the gate rejects a missing scope before anything else.
pub trait ScopedCreator {
    fn scope_id(&self) -> Option<ScopeId>;
}

/// A filter over entities of one scope.
pub trait ScopedQuery {
    fn scope_id(&self) -> Option<ScopeId>;

    /// Requested window over the result set. Defaults to everything.
    fn paging(&self) -> Paging {
        Paging::default()
    }
}
