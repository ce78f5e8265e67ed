//! `accessgate-core` — identifiers and entity shapes shared by every gated service.
//!
//! This crate contains **pure** primitives (no storage or authorization concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod query;
pub mod validate;

pub use entity::{Entity, ScopedCreator, ScopedQuery};
pub use error::{ValidationError, ValidationResult, ValidationRule};
pub use id::{EntityId, RoleId, ScopeId, UserId};
pub use query::{ListResult, Paging};
