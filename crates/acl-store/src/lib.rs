//! # ACL Store
//!
//! Persistence boundary for the ACL crates: role/permission CRUD, slug and
//! resource queries, the grant/revoke/sync association protocol, and the
//! write-boundary invalidation contract.
//!
//! ## Overview
//!
//! - [`AclStore`]: the async store trait consumed by the engine and guards
//! - [`MemoryStore`]: in-memory implementation for single-process use and tests
//! - [`WriteObserver`]: synchronous post-commit notification hook; the
//!   engine's registrar subscribes to run evict-then-rebuild before a write
//!   returns
//! - [`StoreError`]: the fail-loud/not-found/invalid-reference taxonomy
//!
//! ## Resolution policy
//!
//! Single references fail loudly: `find_role_by_slug`, `attach_role_by_slug`
//! and friends return `RoleNotFound`/`PermissionNotFound` when nothing
//! matches, and `InvalidReference` for blank slugs. Bulk slug/resource forms
//! (`grant_permissions_by_slug`, `revoke_roles_by_slug`, ...) resolve to
//! zero or more rows and silently do nothing on zero matches.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use acl_model::Role;
//! use acl_store::{AclStore, MemoryStore};
//! use uuid::Uuid;
//!
//! # async fn demo() -> Result<(), acl_store::StoreError> {
//! let store = MemoryStore::new();
//! let admin = store.create_role(Role::new("Administrator", "admin")).await?;
//!
//! let subject_id = Uuid::now_v7();
//! store.attach_role(subject_id, admin.id).await?;
//!
//! let subject = store.load_subject(subject_id).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod memory;
pub mod store;

// Re-export main types for convenience
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use store::{AclChange, AclStore, PermissionWithRoles, SyncChanges, WriteObserver};
