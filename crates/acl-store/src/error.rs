//! Error types for store operations
//!
//! Fail-loud lookups (single slug or row handle) surface `RoleNotFound` /
//! `PermissionNotFound`; malformed references surface `InvalidReference`.
//! Bulk slug/resource queries that match zero rows are *not* errors: they
//! resolve to empty sets and the association operation becomes a no-op.

use thiserror::Error;

/// Store error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No role matches the given slug or id
    #[error("Role not found: {0}")]
    RoleNotFound(String),

    /// No permission matches the given slug or id
    #[error("Permission not found: {0}")]
    PermissionNotFound(String),

    /// A row with the given slug already exists
    #[error("Duplicate slug: {0}")]
    DuplicateSlug(String),

    /// The reference is not a usable role/permission reference
    #[error("Invalid reference: expected a non-empty slug, a slug list, or a typed slug mapping, got {0}")]
    InvalidReference(String),

    /// The backing store failed
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Whether this error is a caller-facing contract violation (bad input)
    /// rather than an infrastructure fault.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            StoreError::RoleNotFound(_)
                | StoreError::PermissionNotFound(_)
                | StoreError::DuplicateSlug(_)
                | StoreError::InvalidReference(_)
        )
    }
}
