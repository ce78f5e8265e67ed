//! Transactional persistence abstractions.

pub mod in_memory;
pub mod transactional;

pub use in_memory::{HasTable, InMemoryStore, InMemoryTable};
pub use transactional::{StoreError, TransactionalStore};
