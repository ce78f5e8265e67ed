use std::sync::Arc;

use thiserror::Error;

/// Persistence failure.
///
/// These are **infrastructure errors**: they may carry backend detail for
/// logging, which callers of a gated service never see.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage lock poisoned")]
    LockPoisoned,

    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("backend failure: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Transactional access to a storage connection.
///
/// `work` is a unit of storage access run against the store's connection
/// handle. Its error type is chosen by the caller so that domain outcomes
/// (e.g. "not found") can abort a transaction alongside storage failures.
///
/// ## Transaction Semantics
///
/// `run_in_transaction()`:
/// - runs `work` isolated from every other transaction on the same store
/// - commits everything `work` did when it returns `Ok`
/// - rolls everything back when it returns `Err`
///
/// `run_read_only()`:
/// - observes committed state only
/// - cannot mutate (the connection is borrowed shared)
///
/// Implementations never retry; failures propagate to the caller.
pub trait TransactionalStore: Send + Sync {
    type Conn;

    fn run_in_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self::Conn) -> Result<T, E>,
        E: From<StoreError>;

    fn run_read_only<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&Self::Conn) -> Result<T, E>,
        E: From<StoreError>;
}

impl<S> TransactionalStore for Arc<S>
where
    S: TransactionalStore + ?Sized,
{
    type Conn = S::Conn;

    fn run_in_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self::Conn) -> Result<T, E>,
        E: From<StoreError>,
    {
        (**self).run_in_transaction(work)
    }

    fn run_read_only<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&Self::Conn) -> Result<T, E>,
        E: From<StoreError>,
    {
        (**self).run_read_only(work)
    }
}
