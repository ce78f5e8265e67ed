//! `accessgate-service` — the permission gate in front of entity storage.
//!
//! Every entity kind plugs into `GatedRepository`, which runs
//! validate → authorize → transact for create, find, query, count and delete.

pub mod error;
pub mod gate;

pub use error::{ServiceError, ServiceResult};
pub use gate::{Audit, EntityService, GatedEntity, GatedRepository};
