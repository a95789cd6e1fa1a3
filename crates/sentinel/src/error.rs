//! Error taxonomy for the early-warning core.

use thiserror::Error;
use uuid::Uuid;

use crate::types::Role;

/// Convenience alias used throughout the services.
pub type SentinelResult<T> = Result<T, SentinelError>;

/// Malformed or out-of-range input, detected before any write.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("validation failed: {}", .fields.join(", "))]
pub struct ValidationError {
    /// Names of the offending input fields.
    pub fields: Vec<String>,
}

impl ValidationError {
    /// Validation failure for a set of fields.
    #[must_use]
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Validation failure for a single field.
    #[must_use]
    pub fn field(name: &str) -> Self {
        Self {
            fields: vec![name.to_string()],
        }
    }
}

/// Persistence-layer failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No alert exists with the given id.
    #[error("alert not found: {0}")]
    AlertNotFound(Uuid),

    /// Conditional claim found the alert in a non-pending state. Exactly one
    /// concurrent claim wins; the rest land here.
    #[error("claim rejected: alert is no longer pending investigation")]
    ClaimConflict,

    /// Ownership-predicated update matched no row. "Alert not found" and
    /// "caller is not the investigator" are deliberately indistinguishable.
    #[error("update failed or unauthorized")]
    NoMatch,

    /// Backend failure (connectivity, corruption, broken reference).
    #[error("store error: {0}")]
    Backend(String),
}

/// Service-level failures surfaced to the request boundary.
#[derive(Debug, Error)]
pub enum SentinelError {
    /// Client fault: rejected before any write.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Caller's role claim does not permit the attempted action.
    #[error("role {role:?} may not {action}")]
    Forbidden {
        role: Role,
        action: &'static str,
    },

    /// Persistence failure on a required read or write.
    #[error(transparent)]
    Store(#[from] StoreError),
}
