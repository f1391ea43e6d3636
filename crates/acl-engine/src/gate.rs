//! Gate
//!
//! Request-time authorization checks against the published ability map and
//! a principal snapshot. The map is swapped whole on every rebuild: readers
//! clone an `Arc` and evaluate against a consistent snapshot, so concurrent
//! checks never observe a half-built map.
//!
//! ## Anonymous checks
//!
//! Every check takes `Option<&Subject>`. With `None` the gate applies the
//! deliberate anonymous-access policy: permission checks are evaluated
//! against the role slugged `guest` (configurable) if the store has one,
//! otherwise they are false; role checks pass only for the guest slug
//! itself. This is a documented fallback, not an error path.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use acl_model::{GrantedRole, HasPermissions, Subject};
use acl_store::{AclStore, StoreError};

use crate::ability::{AbilityMap, Policy};
use crate::config::AclConfig;

/// Handler invoked for delegate (`@`) abilities.
///
/// Receives the opaque handler reference and the subject under check.
pub type DelegateResolver = Arc<dyn Fn(&str, &Subject) -> bool + Send + Sync>;

/// The authorization gate.
pub struct Gate {
    store: Arc<dyn AclStore>,
    config: AclConfig,
    abilities: RwLock<Arc<AbilityMap>>,
    delegate_resolver: RwLock<Option<DelegateResolver>>,
}

impl std::fmt::Debug for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gate").field("config", &self.config).finish()
    }
}

impl Gate {
    /// Create a gate with an empty ability map.
    pub fn new(store: Arc<dyn AclStore>, config: AclConfig) -> Self {
        Self {
            store,
            config,
            abilities: RwLock::new(Arc::new(AbilityMap::new())),
            delegate_resolver: RwLock::new(None),
        }
    }

    /// Publish a freshly built ability map, replacing the snapshot atomically.
    pub async fn publish(&self, map: AbilityMap) {
        debug!(abilities = map.len(), "ability map published");
        *self.abilities.write().await = Arc::new(map);
    }

    /// The current ability-map snapshot.
    pub async fn abilities(&self) -> Arc<AbilityMap> {
        self.abilities.read().await.clone()
    }

    /// Install the handler for delegate abilities.
    pub async fn set_delegate_resolver(&self, resolver: DelegateResolver) {
        *self.delegate_resolver.write().await = Some(resolver);
    }

    /// Whether the principal is allowed the named ability.
    ///
    /// Unknown abilities are denied. Delegate abilities are denied unless a
    /// resolver is installed and grants them; they never apply to anonymous
    /// principals.
    pub async fn allows(&self, subject: Option<&Subject>, ability: &str) -> bool {
        let map = self.abilities().await;
        match map.policy(ability) {
            Some(Policy::SlugMembership(slug)) => match subject {
                Some(subject) => subject.can(slug),
                None => self.guest_can_at_least(&[slug.as_str()]).await,
            },
            Some(Policy::Delegate(handler)) => {
                let subject = match subject {
                    Some(subject) => subject,
                    None => return false,
                };
                match self.delegate_resolver.read().await.as_ref() {
                    Some(resolver) => resolver(handler, subject),
                    None => false,
                }
            }
            None => false,
        }
    }

    /// Denial form of [`Gate::allows`].
    pub async fn denies(&self, subject: Option<&Subject>, ability: &str) -> bool {
        !self.allows(subject, ability).await
    }

    /// Whether the principal holds at least one of the permission slugs.
    pub async fn can_at_least(&self, subject: Option<&Subject>, permissions: &[&str]) -> bool {
        match subject {
            Some(subject) => subject.can_at_least(permissions),
            None => self.guest_can_at_least(permissions).await,
        }
    }

    /// Whether the principal holds at least one of the role slugs.
    ///
    /// Anonymous principals hold exactly the guest role: the check passes
    /// iff the requested list names the configured guest slug.
    pub async fn has_role(&self, subject: Option<&Subject>, roles: &[&str]) -> bool {
        match subject {
            Some(subject) => acl_model::HasRoles::has_any_role(subject, roles),
            None => roles.contains(&self.config.guest_role_slug.as_str()),
        }
    }

    /// Combined permission-or-role check over a mixed ACL list.
    pub async fn can_access(&self, subject: Option<&Subject>, acl: &[&str]) -> bool {
        self.can_at_least(subject, acl).await || self.has_role(subject, acl).await
    }

    /// Evaluate a permission check against the guest role's grants.
    async fn guest_can_at_least(&self, permissions: &[&str]) -> bool {
        match self.guest_grants().await {
            Some(guest) => guest.can_at_least(permissions),
            None => false,
        }
    }

    /// The guest role with its grants, if the store has one.
    ///
    /// Store failures fail closed for anonymous principals.
    async fn guest_grants(&self) -> Option<GrantedRole> {
        match self
            .store
            .load_role_grants(&self.config.guest_role_slug)
            .await
        {
            Ok(guest) => Some(guest),
            Err(StoreError::RoleNotFound(_)) => None,
            Err(err) => {
                debug!(error = %err, "guest role lookup failed");
                None
            }
        }
    }
}
