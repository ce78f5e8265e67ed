//! Permission-gated entity access.
//!
//! Every operation on a protected entity runs the same pipeline:
//!
//! ```text
//! Operation
//!   ↓
//! 1. Validate inputs (scope present, entity-specific field rules)
//!   ↓
//! 2. Check permission (domain, action, scope) with the authorization service
//!   ↓
//! 3. Execute the storage call inside a transaction (read-only for lookups)
//! ```
//!
//! Malformed input never reaches the authorization service, so a validation
//! failure reads the same whether or not the scope exists. Storage is touched
//! only after the permission check succeeded.
//!
//! `GatedRepository` implements the pipeline once, generic over:
//! - `K`: the entity kind (`GatedEntity`): domain, field rules, storage calls
//! - `A`: the authorization service
//! - `S`: the transactional store
//!
//! The gate holds no locks and caches no decisions. Mutual exclusion is the
//! store's job; the delete existence check and the delete share one transaction.

use chrono::{DateTime, Utc};

use accessgate_auth::{Action, AuthorizationService, Domain, Permission, PrincipalId, Session};
use accessgate_core::{
    Entity, EntityId, ListResult, Paging, ScopeId, ScopedCreator, ScopedQuery, ValidationResult,
    validate,
};
use accessgate_infra::{GateConfig, StoreError, TransactionalStore};

use crate::error::{ServiceError, ServiceResult};

/// Who created a row, and when. Stamped by the gate on every insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Audit {
    pub principal_id: PrincipalId,
    pub at: DateTime<Utc>,
}

impl Audit {
    pub fn now(principal_id: PrincipalId) -> Self {
        Self {
            principal_id,
            at: Utc::now(),
        }
    }
}

/// Per-entity hooks plugged into the gate.
///
/// A kind supplies what differs between entities: the permission domain, the
/// field-level validation rules and the concrete storage calls. Everything
/// else (ordering, permission checks, transactions, error mapping) is the gate's.
///
/// Storage hooks receive the validated scope explicitly and must filter by it.
pub trait GatedEntity: Send + Sync {
    type Entity: Entity;
    type Creator: ScopedCreator;
    type Query: ScopedQuery;
    /// A creator that passed validation.
    type Draft;
    /// Connection handle of the store this kind persists to.
    type Conn;

    /// Entity type name used in errors and logs (e.g. `"userRoles"`).
    const ENTITY_TYPE: &'static str;

    /// Permission domain guarding this entity.
    fn domain(&self) -> Domain;

    /// Field rules for creators. The scope has already been checked.
    fn validate_creator(&self, scope_id: ScopeId, creator: Self::Creator) -> ValidationResult<Self::Draft>;

    /// Extra rules for queries. The scope has already been checked.
    fn validate_query(&self, _query: &Self::Query) -> ValidationResult<()> {
        Ok(())
    }

    fn insert(&self, conn: &mut Self::Conn, draft: Self::Draft, audit: &Audit) -> Result<Self::Entity, StoreError>;

    fn find(&self, conn: &Self::Conn, id: EntityId) -> Result<Option<Self::Entity>, StoreError>;

    /// Matches of `query` within `scope_id`, windowed by `paging`.
    fn query(
        &self,
        conn: &Self::Conn,
        scope_id: ScopeId,
        query: &Self::Query,
        paging: Paging,
    ) -> Result<ListResult<Self::Entity>, StoreError>;

    /// Number of matches of `query` within `scope_id`, ignoring paging.
    fn count(&self, conn: &Self::Conn, scope_id: ScopeId, query: &Self::Query) -> Result<u64, StoreError>;

    fn delete(&self, conn: &mut Self::Conn, id: EntityId) -> Result<(), StoreError>;
}

/// Generic CRUD façade over a scope-aware entity.
///
/// Callers are request handlers that already authenticated the caller and built
/// its `Session`.
pub trait EntityService {
    type Entity;
    type Creator;
    type Query;

    /// Create an entity; requires `write` on the creator's scope.
    fn create(&self, session: &Session, creator: Self::Creator) -> ServiceResult<Self::Entity>;

    /// Look up an entity; requires `read` on `scope_id`.
    ///
    /// An entity stored under a different scope is reported as not found.
    fn find(&self, session: &Session, scope_id: ScopeId, entity_id: EntityId) -> ServiceResult<Self::Entity>;

    /// Query entities; requires `read` on the query's scope.
    fn query(&self, session: &Session, query: &Self::Query) -> ServiceResult<ListResult<Self::Entity>>;

    /// Count matches with the same filtering as `query`, ignoring paging.
    fn count(&self, session: &Session, query: &Self::Query) -> ServiceResult<u64>;

    /// Delete an entity; requires `delete` on `scope_id`.
    fn delete(&self, session: &Session, scope_id: ScopeId, entity_id: EntityId) -> ServiceResult<()>;
}

/// Outcome of transactional work that did not complete.
#[derive(Debug)]
enum TxFailure {
    NotFound,
    Store(StoreError),
}

impl From<StoreError> for TxFailure {
    fn from(value: StoreError) -> Self {
        TxFailure::Store(value)
    }
}

/// The validate → authorize → transact pipeline, shared by every entity kind.
///
/// Collaborators are supplied at construction and never change afterwards, so
/// a repository can be shared across threads (`Arc`) when they are `Sync`.
#[derive(Debug)]
pub struct GatedRepository<K, A, S> {
    kind: K,
    authz: A,
    store: S,
    config: GateConfig,
}

impl<K, A, S> GatedRepository<K, A, S> {
    pub fn new(kind: K, authz: A, store: S) -> Self {
        Self::with_config(kind, authz, store, GateConfig::default())
    }

    pub fn with_config(kind: K, authz: A, store: S, config: GateConfig) -> Self {
        Self {
            kind,
            authz,
            store,
            config,
        }
    }
}

impl<K, A, S> GatedRepository<K, A, S>
where
    K: GatedEntity,
    A: AuthorizationService,
    S: TransactionalStore<Conn = K::Conn>,
{
    fn authorize(&self, session: &Session, action: Action, scope_id: ScopeId) -> ServiceResult<()> {
        let permission = Permission::scoped(self.kind.domain(), action, scope_id);
        self.authz.check_permission(session, &permission)?;
        tracing::debug!(required = %permission, "permission granted");
        Ok(())
    }

    /// Reject an explicit limit above the configured maximum.
    ///
    /// A query without a limit is not bounded by the maximum, so `query` and
    /// `count` always agree on the size of an unpaged result.
    fn check_paging(&self, query: &K::Query) -> ServiceResult<()> {
        if let (Some(limit), Some(max)) = (query.paging().limit, self.config.max_query_limit) {
            validate::at_most(limit, max, "query.limit")?;
        }
        Ok(())
    }

    fn not_found(&self, id: EntityId) -> ServiceError {
        ServiceError::EntityNotFound {
            entity_type: K::ENTITY_TYPE,
            id,
        }
    }

    fn storage_error(&self, operation: &'static str, err: StoreError) -> ServiceError {
        tracing::error!(
            operation,
            entity_type = K::ENTITY_TYPE,
            error = %err,
            "storage failure; transaction rolled back"
        );
        ServiceError::Storage {
            operation,
            entity_type: K::ENTITY_TYPE,
        }
    }
}

impl<K, A, S> EntityService for GatedRepository<K, A, S>
where
    K: GatedEntity,
    A: AuthorizationService,
    S: TransactionalStore<Conn = K::Conn>,
{
    type Entity = K::Entity;
    type Creator = K::Creator;
    type Query = K::Query;

    fn create(&self, session: &Session, creator: K::Creator) -> ServiceResult<K::Entity> {
        let span = tracing::debug_span!(
            "gate.create",
            entity_type = K::ENTITY_TYPE,
            principal = %session.principal_id()
        );
        let _guard = span.enter();

        // 1) Validate
        let scope_id = validate::not_null(creator.scope_id(), "creator.scopeId")?;
        let draft = self.kind.validate_creator(scope_id, creator)?;

        // 2) Authorize
        self.authorize(session, Action::Write, scope_id)?;

        // 3) Insert (single transaction)
        let audit = Audit::now(session.principal_id());
        let created = self
            .store
            .run_in_transaction(|conn| self.kind.insert(conn, draft, &audit))
            .map_err(|e| self.storage_error("create", e))?;

        tracing::debug!(entity_id = %created.id(), scope_id = %scope_id, "entity created");
        Ok(created)
    }

    fn find(&self, session: &Session, scope_id: ScopeId, entity_id: EntityId) -> ServiceResult<K::Entity> {
        let span = tracing::debug_span!(
            "gate.find",
            entity_type = K::ENTITY_TYPE,
            principal = %session.principal_id(),
            %scope_id,
            %entity_id
        );
        let _guard = span.enter();

        self.authorize(session, Action::Read, scope_id)?;

        let found = self
            .store
            .run_read_only(|conn| self.kind.find(conn, entity_id))
            .map_err(|e| self.storage_error("find", e))?;

        // Cross-scope hits are indistinguishable from misses.
        match found {
            Some(entity) if entity.scope_id() == scope_id => Ok(entity),
            _ => Err(self.not_found(entity_id)),
        }
    }

    fn query(&self, session: &Session, query: &K::Query) -> ServiceResult<ListResult<K::Entity>> {
        let span = tracing::debug_span!(
            "gate.query",
            entity_type = K::ENTITY_TYPE,
            principal = %session.principal_id()
        );
        let _guard = span.enter();

        let scope_id = validate::not_null(query.scope_id(), "query.scopeId")?;
        self.kind.validate_query(query)?;
        self.check_paging(query)?;

        self.authorize(session, Action::Read, scope_id)?;

        let result = self
            .store
            .run_read_only(|conn| self.kind.query(conn, scope_id, query, query.paging()))
            .map_err(|e| self.storage_error("query", e))?;

        tracing::debug!(
            size = result.size(),
            limit_exceeded = result.limit_exceeded(),
            "query complete"
        );
        Ok(result)
    }

    fn count(&self, session: &Session, query: &K::Query) -> ServiceResult<u64> {
        let span = tracing::debug_span!(
            "gate.count",
            entity_type = K::ENTITY_TYPE,
            principal = %session.principal_id()
        );
        let _guard = span.enter();

        let scope_id = validate::not_null(query.scope_id(), "query.scopeId")?;
        self.kind.validate_query(query)?;
        self.check_paging(query)?;

        self.authorize(session, Action::Read, scope_id)?;

        self.store
            .run_read_only(|conn| self.kind.count(conn, scope_id, query))
            .map_err(|e| self.storage_error("count", e))
    }

    fn delete(&self, session: &Session, scope_id: ScopeId, entity_id: EntityId) -> ServiceResult<()> {
        let span = tracing::debug_span!(
            "gate.delete",
            entity_type = K::ENTITY_TYPE,
            principal = %session.principal_id(),
            %scope_id,
            %entity_id
        );
        let _guard = span.enter();

        self.authorize(session, Action::Delete, scope_id)?;

        // Existence check and delete share the transaction.
        self.store
            .run_in_transaction(|conn| -> Result<(), TxFailure> {
                match self.kind.find(conn, entity_id)? {
                    Some(existing) if existing.scope_id() == scope_id => {}
                    _ => return Err(TxFailure::NotFound),
                }
                self.kind.delete(conn, entity_id)?;
                Ok(())
            })
            .map_err(|failure| match failure {
                TxFailure::NotFound => self.not_found(entity_id),
                TxFailure::Store(e) => self.storage_error("delete", e),
            })?;

        tracing::debug!("entity deleted");
        Ok(())
    }
}
