//! # ACL Guard
//!
//! Request-time guard surface over the ACL gate, independent of any web
//! framework.
//!
//! ## Overview
//!
//! - [`PermissionGuard`] / [`RoleGuard`] / [`CanAtLeastGuard`]: check
//!   objects returning `Result<(), AccessDenied>`, ready to sit behind a
//!   route handler or extractor
//! - [`AccessDenied`]: the structured denial payload, with fixed status
//!   codes and messages
//! - [`directives`]: boolean predicates for template engines (`can_at_least`,
//!   `has_role`, `is_role`)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use acl_engine::{bootstrap, AclConfig, MemoryCache};
//! use acl_guard::RoleGuard;
//! use acl_store::MemoryStore;
//!
//! # async fn demo() {
//! let store = Arc::new(MemoryStore::new());
//! let (gate, _registrar) = bootstrap(
//!     store,
//!     Arc::new(MemoryCache::new()),
//!     AclConfig::default(),
//! )
//! .await;
//!
//! let guard = RoleGuard::new(gate);
//! match guard.check(None, "admin|moderator").await {
//!     Ok(()) => { /* proceed with the request */ }
//!     Err(denied) => {
//!         let status = denied.status_code();
//!         let body = denied.to_json();
//!         // render `status` / `body` in the adapter
//!         # let _ = (status, body);
//!     }
//! }
//! # }
//! ```

pub mod directives;
pub mod error;
pub mod guards;

// Re-export main types for convenience
pub use error::AccessDenied;
pub use guards::{CanAtLeastGuard, PermissionGuard, RoleGuard};
