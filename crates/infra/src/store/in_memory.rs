use std::sync::RwLock;

use accessgate_core::{Entity, EntityId};

use super::transactional::{StoreError, TransactionalStore};

/// In-memory transactional store.
///
/// Intended for tests/dev. Not optimized for performance: every transaction
/// works on a staged copy of the whole state, which replaces the committed
/// state only when the work succeeds.
///
/// ## Isolation
///
/// Transactions run under the write lock, so they are serialized with each
/// other and with readers. A check-then-act sequence inside one transaction
/// (e.g. "fetch, then delete if present") cannot interleave with another writer.
#[derive(Debug, Default)]
pub struct InMemoryStore<D> {
    state: RwLock<D>,
}

impl<D> InMemoryStore<D> {
    pub fn new(state: D) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }
}

impl<D> TransactionalStore for InMemoryStore<D>
where
    D: Clone + Send + Sync,
{
    type Conn = D;

    fn run_in_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut D) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut committed = self.state.write().map_err(|_| StoreError::LockPoisoned)?;

        let mut staged = committed.clone();
        let out = work(&mut staged)?;
        *committed = staged;

        Ok(out)
    }

    fn run_read_only<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&D) -> Result<T, E>,
        E: From<StoreError>,
    {
        let committed = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        work(&committed)
    }
}

/// Rows of one entity type, in insertion order.
#[derive(Debug, Clone)]
pub struct InMemoryTable<E> {
    rows: Vec<E>,
}

impl<E> Default for InMemoryTable<E> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<E> InMemoryTable<E>
where
    E: Entity,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, row: E) -> Result<(), StoreError> {
        let id = row.id();
        if self.rows.iter().any(|r| r.id() == id) {
            return Err(StoreError::Duplicate(id.to_string()));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn get(&self, id: EntityId) -> Option<&E> {
        self.rows.iter().find(|r| r.id() == id)
    }

    /// Remove a row; returns whether it existed.
    pub fn remove(&mut self, id: EntityId) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| r.id() != id);
        self.rows.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Access to the table of `E` inside a larger in-memory state.
///
/// Lets one store hold several entity types while each entity's storage hooks
/// only see their own table.
pub trait HasTable<E> {
    fn table(&self) -> &InMemoryTable<E>;
    fn table_mut(&mut self) -> &mut InMemoryTable<E>;
}

impl<E> HasTable<E> for InMemoryTable<E> {
    fn table(&self) -> &InMemoryTable<E> {
        self
    }

    fn table_mut(&mut self) -> &mut InMemoryTable<E> {
        self
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use accessgate_core::ScopeId;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: EntityId,
        scope_id: ScopeId,
    }

    impl Entity for Row {
        fn id(&self) -> EntityId {
            self.id
        }

        fn scope_id(&self) -> ScopeId {
            self.scope_id
        }
    }

    fn row() -> Row {
        Row {
            id: EntityId::new(),
            scope_id: ScopeId::new(),
        }
    }

    #[derive(Debug)]
    enum Failure {
        Store,
        Rejected,
    }

    impl From<StoreError> for Failure {
        fn from(_: StoreError) -> Self {
            Failure::Store
        }
    }

    #[test]
    fn committed_work_is_visible_to_readers() {
        let store: InMemoryStore<InMemoryTable<Row>> = InMemoryStore::default();
        let r = row();

        store
            .run_in_transaction(|t| t.table_mut().insert(r.clone()))
            .unwrap();

        let found: Result<Option<Row>, StoreError> =
            store.run_read_only(|t| Ok(t.table().get(r.id).cloned()));
        assert_eq!(found.unwrap(), Some(r));
    }

    #[test]
    fn failed_work_is_rolled_back() {
        let store: InMemoryStore<InMemoryTable<Row>> = InMemoryStore::default();
        let kept = row();
        store
            .run_in_transaction(|t| t.table_mut().insert(kept.clone()))
            .unwrap();

        let result: Result<(), Failure> = store.run_in_transaction(|t| {
            t.table_mut().insert(row())?;
            t.table_mut().remove(kept.id);
            Err(Failure::Rejected)
        });
        assert!(matches!(result, Err(Failure::Rejected)));

        let len: Result<usize, StoreError> = store.run_read_only(|t| Ok(t.len()));
        assert_eq!(len.unwrap(), 1);
        let still_there: Result<bool, StoreError> = store.run_read_only(|t| Ok(t.get(kept.id).is_some()));
        assert!(still_there.unwrap());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut table = InMemoryTable::new();
        let r = row();
        table.insert(r.clone()).unwrap();
        assert!(matches!(table.insert(r), Err(StoreError::Duplicate(_))));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn rows_keep_insertion_order() {
        let mut table = InMemoryTable::new();
        let rows: Vec<Row> = (0..5).map(|_| row()).collect();
        for r in &rows {
            table.insert(r.clone()).unwrap();
        }
        let ids: Vec<EntityId> = table.iter().map(|r| r.id).collect();
        let expected: Vec<EntityId> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn concurrent_transactions_are_serialized() {
        let store: Arc<InMemoryStore<InMemoryTable<Row>>> = Arc::new(InMemoryStore::default());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        store
                            .run_in_transaction(|t: &mut InMemoryTable<Row>| t.insert(row()))
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let len: Result<usize, StoreError> = store.run_read_only(|t| Ok(t.len()));
        assert_eq!(len.unwrap(), 200);
    }
}
