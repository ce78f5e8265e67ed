//! Infrastructure layer: transactional storage and configuration.

pub mod config;
pub mod store;

pub use config::{ConfigError, GateConfig};
pub use store::{HasTable, InMemoryStore, InMemoryTable, StoreError, TransactionalStore};
