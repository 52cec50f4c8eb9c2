//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// ownership, conflicts, stock rules). Transport concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or out-of-range input.
    #[error("{0}")]
    InvalidArgument(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The referenced entity is absent, or belongs to another owner.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The operation collides with existing state (e.g. duplicate inventory record).
    #[error("{0}")]
    Conflict(String),

    /// Not enough available stock to satisfy a reservation.
    #[error("insufficient inventory (requested: {requested}, available: {available})")]
    InsufficientInventory { requested: i64, available: i64 },

    /// Authentication failure at the domain boundary.
    #[error("{0}")]
    Unauthorized(String),
}

impl DomainError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound(entity)
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn insufficient(requested: i64, available: i64) -> Self {
        Self::InsufficientInventory {
            requested,
            available,
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::InvalidArgument(_) => "invalid_argument",
            DomainError::InvalidId(_) => "invalid_id",
            DomainError::NotFound(_) => "not_found",
            DomainError::Conflict(_) => "conflict",
            DomainError::InsufficientInventory { .. } => "insufficient_inventory",
            DomainError::Unauthorized(_) => "unauthorized",
        }
    }
}
