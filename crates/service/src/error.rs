use thiserror::Error;

use accessgate_auth::AuthzError;
use accessgate_core::{EntityId, ValidationError};

/// Result type returned by gated services.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of a gated operation.
///
/// ## Error Categories
///
/// - **Validation**: malformed input, detected before any permission check or IO
/// - **Authorization**: the session lacks the permission for the resolved scope
/// - **EntityNotFound**: lookup or delete target absent (or living in another scope)
/// - **Storage**: persistence failed and the transaction was rolled back
///
/// Storage failures carry the operation and entity type only; backend detail is
/// logged where the failure is observed and never crosses this boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Authorization(#[from] AuthzError),

    #[error("{entity_type} not found: {id}")]
    EntityNotFound {
        entity_type: &'static str,
        id: EntityId,
    },

    #[error("storage failure during {operation} of {entity_type}")]
    Storage {
        operation: &'static str,
        entity_type: &'static str,
    },
}

impl ServiceError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ServiceError::Validation(_))
    }

    pub fn is_authorization(&self) -> bool {
        matches!(self, ServiceError::Authorization(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::EntityNotFound { .. })
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, ServiceError::Storage { .. })
    }
}
