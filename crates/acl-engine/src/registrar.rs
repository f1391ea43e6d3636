//! Gate registrar
//!
//! Owns the permission-list cache and the ability-map rebuild cycle.
//!
//! `register()` reads the permission list (through the cache when enabled),
//! builds the ability map and publishes it to the gate. It is idempotent
//! and safe to call on every invalidation. Store failures during the read
//! are contained here: the cache key is evicted and the registrar degrades
//! to an empty permission list, so an authorization check never sees the
//! infrastructure fault; it simply finds no abilities registered.
//!
//! The registrar implements [`WriteObserver`]: registered on the store, it
//! runs evict → rebuild → session refresh synchronously after every
//! committing role/permission write, before the write call returns. Racing
//! invalidations each run the full cycle, so the published map converges on
//! the latest committed state; last write wins, none is dropped.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use acl_store::{AclChange, AclStore, PermissionWithRoles, WriteObserver};
use tokio::sync::RwLock;

use crate::ability::AbilityMap;
use crate::cache::Cache;
use crate::config::AclConfig;
use crate::gate::Gate;
use crate::session::Session;

/// Builds and publishes the ability map from the permission store.
pub struct GateRegistrar {
    store: Arc<dyn AclStore>,
    cache: Arc<dyn Cache>,
    gate: Arc<Gate>,
    config: AclConfig,
    session: RwLock<Option<Arc<Session>>>,
}

impl std::fmt::Debug for GateRegistrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateRegistrar")
            .field("config", &self.config)
            .finish()
    }
}

impl GateRegistrar {
    /// Create a registrar for the given store, cache and gate.
    pub fn new(
        store: Arc<dyn AclStore>,
        cache: Arc<dyn Cache>,
        gate: Arc<Gate>,
        config: AclConfig,
    ) -> Self {
        Self {
            store,
            cache,
            gate,
            config,
            session: RwLock::new(None),
        }
    }

    /// Attach the session refreshed after each invalidation.
    pub async fn attach_session(&self, session: Arc<Session>) {
        *self.session.write().await = Some(session);
    }

    /// Build the ability map from the current permission list and publish it.
    pub async fn register(&self) {
        let permissions = self.permissions().await;
        let map = AbilityMap::from_permissions(&permissions);
        debug!(
            permissions = permissions.len(),
            abilities = map.len(),
            "registering abilities"
        );
        self.gate.publish(map).await;
    }

    /// Evict the cached permission list, rebuild the ability map, and
    /// refresh the attached session's subject snapshot.
    pub async fn invalidate(&self) {
        self.cache.forget(&self.config.cache_key).await;
        self.register().await;

        if let Some(session) = self.session.read().await.clone() {
            if let Err(err) = session.refresh().await {
                warn!(error = %err, "session refresh after invalidation failed");
            }
        }
    }

    /// The permission list, via cache-aside when caching is enabled.
    ///
    /// Any store failure degrades to an empty list after evicting the key.
    async fn permissions(&self) -> Vec<PermissionWithRoles> {
        let key = self.config.cache_key.as_str();

        if self.config.cache_enabled {
            if let Some(value) = self.cache.get(key).await {
                match serde_json::from_value::<Vec<PermissionWithRoles>>(value) {
                    Ok(permissions) => return permissions,
                    Err(err) => {
                        // Unreadable entry: treat as a miss.
                        warn!(error = %err, "cached permission list is corrupt");
                        self.cache.forget(key).await;
                    }
                }
            }
        }

        let permissions = match self.store.permissions_with_roles().await {
            Ok(permissions) => permissions,
            Err(err) => {
                warn!(error = %err, "permission load failed; registering no abilities");
                self.cache.forget(key).await;
                return Vec::new();
            }
        };

        if self.config.cache_enabled {
            match serde_json::to_value(&permissions) {
                Ok(value) => self.cache.put_forever(key, value).await,
                Err(err) => warn!(error = %err, "permission list not cacheable"),
            }
        }

        permissions
    }
}

#[async_trait]
impl WriteObserver for GateRegistrar {
    async fn acl_changed(&self, _change: AclChange) {
        self.invalidate().await;
    }
}

/// Wire a gate and registrar onto a store and run the initial registration.
///
/// The registrar is registered as the store's write observer, so every
/// subsequent role/permission write re-runs the evict-then-rebuild cycle
/// automatically.
pub async fn bootstrap(
    store: Arc<dyn AclStore>,
    cache: Arc<dyn Cache>,
    config: AclConfig,
) -> (Arc<Gate>, Arc<GateRegistrar>) {
    let gate = Arc::new(Gate::new(store.clone(), config.clone()));
    let registrar = Arc::new(GateRegistrar::new(
        store.clone(),
        cache,
        gate.clone(),
        config,
    ));
    store.register_observer(registrar.clone()).await;
    registrar.register().await;
    (gate, registrar)
}
