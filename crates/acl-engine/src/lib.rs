//! # ACL Engine
//!
//! Policy cache, gate and registrar: the derived side of the ACL crates.
//!
//! ## Overview
//!
//! - [`AbilityMap`]: ability-name → policy snapshot built from the
//!   permission store (slug-as-ability, or delegate handler for `@` slugs)
//! - [`Gate`]: request-time checks against the published snapshot, with the
//!   guest-role fallback for anonymous principals
//! - [`GateRegistrar`]: cache-aside permission loading, fail-open rebuild,
//!   and the evict-then-rebuild invalidation cycle wired to store writes
//! - [`Session`]: explicit principal context, refreshed on invalidation
//! - [`Cache`] / [`MemoryCache`]: the key-value boundary for the permission
//!   list
//!
//! ## Data flow
//!
//! ```text
//! role/permission write
//!   └─ store notifies registrar (WriteObserver)
//!        ├─ cache.forget("permissions.policies")
//!        ├─ register(): load permissions (cache-aside) → AbilityMap → Gate
//!        └─ session.refresh()
//! ```
//!
//! A store failure during the load never reaches the authorization caller:
//! the registrar evicts the key and publishes an empty map, so checks fail
//! closed until the store recovers.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use acl_engine::{bootstrap, AclConfig, MemoryCache};
//! use acl_store::MemoryStore;
//!
//! # async fn demo() {
//! let store = Arc::new(MemoryStore::new());
//! let (gate, registrar) = bootstrap(
//!     store.clone(),
//!     Arc::new(MemoryCache::new()),
//!     AclConfig::default(),
//! )
//! .await;
//!
//! // Writes through the store now rebuild the gate automatically.
//! let allowed = gate.can_at_least(None, &["view-articles"]).await;
//! # }
//! ```

pub mod ability;
pub mod cache;
pub mod config;
pub mod gate;
pub mod registrar;
pub mod session;

// Re-export main types for convenience
pub use ability::{AbilityMap, Policy};
pub use cache::{Cache, MemoryCache};
pub use config::AclConfig;
pub use gate::{DelegateResolver, Gate};
pub use registrar::{bootstrap, GateRegistrar};
pub use session::Session;
