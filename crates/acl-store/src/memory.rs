//! In-memory store implementation
//!
//! Suitable for single-process applications and testing. State lives in
//! `BTreeMap`s behind a tokio `RwLock`; UUID v7 keys keep iteration in
//! insertion order. Observers are notified after the write lock is
//! released, so an observer may re-enter the store to rebuild derived
//! state.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use acl_model::{resource_bundle, GrantedRole, Permission, PermissionSpec, Role, Subject};

use crate::error::{StoreError, StoreResult};
use crate::store::{AclChange, AclStore, PermissionWithRoles, SyncChanges, WriteObserver};

#[derive(Debug, Default)]
struct State {
    roles: BTreeMap<Uuid, Role>,
    permissions: BTreeMap<Uuid, Permission>,
    role_permissions: BTreeMap<Uuid, BTreeSet<Uuid>>,
    subject_roles: BTreeMap<Uuid, BTreeSet<Uuid>>,
    subject_permissions: BTreeMap<Uuid, BTreeSet<Uuid>>,
}

impl State {
    fn role_by_slug(&self, slug: &str) -> Option<&Role> {
        self.roles.values().find(|r| r.slug == slug)
    }

    fn permission_by_slug(&self, slug: &str) -> Option<&Permission> {
        self.permissions.values().find(|p| p.slug == slug)
    }

    fn role_ids_by_slugs(&self, slugs: &[&str]) -> Vec<Uuid> {
        self.roles
            .values()
            .filter(|r| slugs.contains(&r.slug.as_str()))
            .map(|r| r.id)
            .collect()
    }

    fn permission_ids_by_slugs(&self, slugs: &[&str]) -> Vec<Uuid> {
        self.permissions
            .values()
            .filter(|p| slugs.contains(&p.slug.as_str()))
            .map(|p| p.id)
            .collect()
    }

    fn permission_ids_by_resource(&self, resources: &[&str]) -> Vec<Uuid> {
        self.permissions
            .values()
            .filter(|p| resources.contains(&p.resource.as_str()))
            .map(|p| p.id)
            .collect()
    }

    fn permission_slugs_of_role(&self, role_id: Uuid) -> Vec<String> {
        self.role_permissions
            .get(&role_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.permissions.get(id))
                    .map(|p| p.slug.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// In-memory [`AclStore`].
///
/// # Examples
///
/// ```rust,no_run
/// use acl_store::MemoryStore;
/// use acl_model::Role;
///
/// # async fn demo() -> Result<(), acl_store::StoreError> {
/// use acl_store::AclStore;
/// let store = MemoryStore::new();
/// let admin = store.create_role(Role::new("Administrator", "admin")).await?;
/// let found = store.find_role_by_slug("admin").await?;
/// assert_eq!(found.id, admin.id);
/// # Ok(())
/// # }
/// ```
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
    observers: Arc<RwLock<Vec<Arc<dyn WriteObserver>>>>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(State::default())),
            observers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Notify observers after a committed write. Runs with no locks held.
    async fn notify(&self, change: AclChange) {
        let observers = self.observers.read().await.clone();
        for observer in observers {
            observer.acl_changed(change).await;
        }
    }

    fn require_slug(slug: &str) -> StoreResult<&str> {
        let trimmed = slug.trim();
        if trimmed.is_empty() {
            return Err(StoreError::InvalidReference("a blank slug".into()));
        }
        Ok(trimmed)
    }
}

/// Compute the attach/detach/unchanged diff for a sync operation.
fn diff(current: &BTreeSet<Uuid>, wanted: &[Uuid]) -> SyncChanges {
    let wanted: BTreeSet<Uuid> = wanted.iter().copied().collect();

    SyncChanges {
        attached: wanted.difference(current).copied().collect(),
        detached: current.difference(&wanted).copied().collect(),
        unchanged: current.intersection(&wanted).copied().collect(),
    }
}

#[async_trait]
impl AclStore for MemoryStore {
    // ------------------------------------------------------------------
    // Roles
    // ------------------------------------------------------------------

    async fn create_role(&self, role: Role) -> StoreResult<Role> {
        Self::require_slug(&role.slug)?;
        {
            let mut state = self.state.write().await;
            if state.role_by_slug(&role.slug).is_some() {
                return Err(StoreError::DuplicateSlug(role.slug));
            }
            state.roles.insert(role.id, role.clone());
        }
        debug!(slug = %role.slug, "role created");
        self.notify(AclChange::RoleSaved).await;
        Ok(role)
    }

    async fn update_role(&self, role: Role) -> StoreResult<Role> {
        Self::require_slug(&role.slug)?;
        {
            let mut state = self.state.write().await;
            if !state.roles.contains_key(&role.id) {
                return Err(StoreError::RoleNotFound(role.id.to_string()));
            }
            if let Some(existing) = state.role_by_slug(&role.slug) {
                if existing.id != role.id {
                    return Err(StoreError::DuplicateSlug(role.slug));
                }
            }
            state.roles.insert(role.id, role.clone());
        }
        self.notify(AclChange::RoleSaved).await;
        Ok(role)
    }

    async fn delete_role(&self, role_id: Uuid) -> StoreResult<bool> {
        let existed = {
            let mut state = self.state.write().await;
            let existed = state.roles.remove(&role_id).is_some();
            if existed {
                state.role_permissions.remove(&role_id);
                for roles in state.subject_roles.values_mut() {
                    roles.remove(&role_id);
                }
            }
            existed
        };
        if existed {
            self.notify(AclChange::RoleDeleted).await;
        }
        Ok(existed)
    }

    async fn find_role_by_slug(&self, slug: &str) -> StoreResult<Role> {
        let slug = Self::require_slug(slug)?;
        let state = self.state.read().await;
        state
            .role_by_slug(slug)
            .cloned()
            .ok_or_else(|| StoreError::RoleNotFound(slug.to_string()))
    }

    async fn roles_by_slugs(&self, slugs: &[&str]) -> StoreResult<Vec<Role>> {
        let state = self.state.read().await;
        Ok(state
            .roles
            .values()
            .filter(|r| slugs.contains(&r.slug.as_str()))
            .cloned()
            .collect())
    }

    async fn load_role_grants(&self, slug: &str) -> StoreResult<GrantedRole> {
        let slug = Self::require_slug(slug)?;
        let state = self.state.read().await;
        let role = state
            .role_by_slug(slug)
            .cloned()
            .ok_or_else(|| StoreError::RoleNotFound(slug.to_string()))?;
        let permission_slugs = state.permission_slugs_of_role(role.id);
        Ok(GrantedRole::new(role, permission_slugs))
    }

    // ------------------------------------------------------------------
    // Permissions
    // ------------------------------------------------------------------

    async fn create_permission(&self, spec: PermissionSpec) -> StoreResult<Permission> {
        Self::require_slug(&spec.slug)?;
        let permission = {
            let mut state = self.state.write().await;
            if state.permission_by_slug(&spec.slug).is_some() {
                return Err(StoreError::DuplicateSlug(spec.slug));
            }
            let mut permission = Permission::new(spec.name, spec.slug, spec.resource);
            permission.system = spec.system;
            state.permissions.insert(permission.id, permission.clone());
            permission
        };
        debug!(slug = %permission.slug, "permission created");
        self.notify(AclChange::PermissionSaved).await;
        Ok(permission)
    }

    async fn update_permission(&self, permission: Permission) -> StoreResult<Permission> {
        Self::require_slug(&permission.slug)?;
        {
            let mut state = self.state.write().await;
            if !state.permissions.contains_key(&permission.id) {
                return Err(StoreError::PermissionNotFound(permission.id.to_string()));
            }
            if let Some(existing) = state.permission_by_slug(&permission.slug) {
                if existing.id != permission.id {
                    return Err(StoreError::DuplicateSlug(permission.slug));
                }
            }
            state.permissions.insert(permission.id, permission.clone());
        }
        self.notify(AclChange::PermissionSaved).await;
        Ok(permission)
    }

    async fn delete_permission(&self, permission_id: Uuid) -> StoreResult<bool> {
        let existed = {
            let mut state = self.state.write().await;
            let existed = state.permissions.remove(&permission_id).is_some();
            if existed {
                for perms in state.role_permissions.values_mut() {
                    perms.remove(&permission_id);
                }
                for perms in state.subject_permissions.values_mut() {
                    perms.remove(&permission_id);
                }
            }
            existed
        };
        if existed {
            self.notify(AclChange::PermissionDeleted).await;
        }
        Ok(existed)
    }

    async fn create_resource_permissions(
        &self,
        resource: &str,
        system: bool,
    ) -> StoreResult<Vec<Permission>> {
        let created = {
            let mut state = self.state.write().await;
            let mut created = Vec::new();
            for spec in resource_bundle(resource, system) {
                // Existing slug: the bundle tolerates re-runs.
                if state.permission_by_slug(&spec.slug).is_some() {
                    continue;
                }
                let mut permission = Permission::new(spec.name, spec.slug, spec.resource);
                permission.system = spec.system;
                state.permissions.insert(permission.id, permission.clone());
                created.push(permission);
            }
            created
        };
        if !created.is_empty() {
            self.notify(AclChange::PermissionSaved).await;
        }
        Ok(created)
    }

    async fn find_permission_by_slug(&self, slug: &str) -> StoreResult<Permission> {
        let slug = Self::require_slug(slug)?;
        let state = self.state.read().await;
        state
            .permission_by_slug(slug)
            .cloned()
            .ok_or_else(|| StoreError::PermissionNotFound(slug.to_string()))
    }

    async fn permissions_by_slugs(&self, slugs: &[&str]) -> StoreResult<Vec<Permission>> {
        let state = self.state.read().await;
        Ok(state
            .permissions
            .values()
            .filter(|p| slugs.contains(&p.slug.as_str()))
            .cloned()
            .collect())
    }

    async fn permissions_by_resource(&self, resources: &[&str]) -> StoreResult<Vec<Permission>> {
        let state = self.state.read().await;
        Ok(state
            .permissions
            .values()
            .filter(|p| resources.contains(&p.resource.as_str()))
            .cloned()
            .collect())
    }

    async fn permissions_with_roles(&self) -> StoreResult<Vec<PermissionWithRoles>> {
        let state = self.state.read().await;
        Ok(state
            .permissions
            .values()
            .map(|permission| {
                let roles = state
                    .role_permissions
                    .iter()
                    .filter(|(_, perms)| perms.contains(&permission.id))
                    .filter_map(|(role_id, _)| state.roles.get(role_id))
                    .cloned()
                    .collect();
                PermissionWithRoles {
                    permission: permission.clone(),
                    roles,
                }
            })
            .collect())
    }

    // ------------------------------------------------------------------
    // Role ↔ Permission
    // ------------------------------------------------------------------

    async fn grant_permission(&self, role_id: Uuid, permission_id: Uuid) -> StoreResult<()> {
        let changed = {
            let mut state = self.state.write().await;
            if !state.roles.contains_key(&role_id) {
                return Err(StoreError::RoleNotFound(role_id.to_string()));
            }
            if !state.permissions.contains_key(&permission_id) {
                return Err(StoreError::PermissionNotFound(permission_id.to_string()));
            }
            state
                .role_permissions
                .entry(role_id)
                .or_default()
                .insert(permission_id)
        };
        if changed {
            self.notify(AclChange::GrantsChanged).await;
        }
        Ok(())
    }

    async fn grant_permissions_by_slug(&self, role_id: Uuid, slugs: &[&str]) -> StoreResult<()> {
        // Resolve and mutate under one lock so a concurrent permission
        // delete cannot slip between resolution and attachment.
        let changed = {
            let mut state = self.state.write().await;
            if !state.roles.contains_key(&role_id) {
                return Err(StoreError::RoleNotFound(role_id.to_string()));
            }
            let ids = state.permission_ids_by_slugs(slugs);
            let attached = state.role_permissions.entry(role_id).or_default();
            let mut changed = false;
            for id in ids {
                changed |= attached.insert(id);
            }
            changed
        };
        if changed {
            self.notify(AclChange::GrantsChanged).await;
        }
        Ok(())
    }

    async fn grant_permissions_by_resource(
        &self,
        role_id: Uuid,
        resources: &[&str],
    ) -> StoreResult<()> {
        let changed = {
            let mut state = self.state.write().await;
            if !state.roles.contains_key(&role_id) {
                return Err(StoreError::RoleNotFound(role_id.to_string()));
            }
            let ids = state.permission_ids_by_resource(resources);
            let attached = state.role_permissions.entry(role_id).or_default();
            let mut changed = false;
            for id in ids {
                changed |= attached.insert(id);
            }
            changed
        };
        if changed {
            self.notify(AclChange::GrantsChanged).await;
        }
        Ok(())
    }

    async fn revoke_permission(&self, role_id: Uuid, permission_id: Uuid) -> StoreResult<()> {
        let changed = {
            let mut state = self.state.write().await;
            state
                .role_permissions
                .get_mut(&role_id)
                .map(|perms| perms.remove(&permission_id))
                .unwrap_or(false)
        };
        if changed {
            self.notify(AclChange::GrantsChanged).await;
        }
        Ok(())
    }

    async fn revoke_permissions_by_slug(
        &self,
        role_id: Uuid,
        slugs: &[&str],
    ) -> StoreResult<usize> {
        let detached = {
            let mut state = self.state.write().await;
            let ids = state.permission_ids_by_slugs(slugs);
            match state.role_permissions.get_mut(&role_id) {
                Some(perms) => ids.iter().filter(|id| perms.remove(id)).count(),
                None => 0,
            }
        };
        if detached > 0 {
            self.notify(AclChange::GrantsChanged).await;
        }
        Ok(detached)
    }

    async fn revoke_permissions_by_resource(
        &self,
        role_id: Uuid,
        resources: &[&str],
    ) -> StoreResult<usize> {
        let detached = {
            let mut state = self.state.write().await;
            let ids = state.permission_ids_by_resource(resources);
            match state.role_permissions.get_mut(&role_id) {
                Some(perms) => ids.iter().filter(|id| perms.remove(id)).count(),
                None => 0,
            }
        };
        if detached > 0 {
            self.notify(AclChange::GrantsChanged).await;
        }
        Ok(detached)
    }

    async fn revoke_all_permissions(&self, role_id: Uuid) -> StoreResult<usize> {
        let detached = {
            let mut state = self.state.write().await;
            state
                .role_permissions
                .remove(&role_id)
                .map(|perms| perms.len())
                .unwrap_or(0)
        };
        if detached > 0 {
            self.notify(AclChange::GrantsChanged).await;
        }
        Ok(detached)
    }

    async fn sync_permissions(
        &self,
        role_id: Uuid,
        permission_ids: &[Uuid],
    ) -> StoreResult<SyncChanges> {
        let changes = {
            let mut state = self.state.write().await;
            if !state.roles.contains_key(&role_id) {
                return Err(StoreError::RoleNotFound(role_id.to_string()));
            }
            for id in permission_ids {
                if !state.permissions.contains_key(id) {
                    return Err(StoreError::PermissionNotFound(id.to_string()));
                }
            }
            let current = state.role_permissions.entry(role_id).or_default();
            let changes = diff(current, permission_ids);
            *current = permission_ids.iter().copied().collect();
            changes
        };
        if !changes.is_noop() {
            self.notify(AclChange::GrantsChanged).await;
        }
        Ok(changes)
    }

    // ------------------------------------------------------------------
    // Subject ↔ Role
    // ------------------------------------------------------------------

    async fn attach_role(&self, subject_id: Uuid, role_id: Uuid) -> StoreResult<()> {
        let changed = {
            let mut state = self.state.write().await;
            if !state.roles.contains_key(&role_id) {
                return Err(StoreError::RoleNotFound(role_id.to_string()));
            }
            state
                .subject_roles
                .entry(subject_id)
                .or_default()
                .insert(role_id)
        };
        if changed {
            self.notify(AclChange::GrantsChanged).await;
        }
        Ok(())
    }

    async fn attach_role_by_slug(&self, subject_id: Uuid, slug: &str) -> StoreResult<()> {
        let role = self.find_role_by_slug(slug).await?;
        self.attach_role(subject_id, role.id).await
    }

    async fn revoke_role(&self, subject_id: Uuid, role_id: Uuid) -> StoreResult<()> {
        let changed = {
            let mut state = self.state.write().await;
            state
                .subject_roles
                .get_mut(&subject_id)
                .map(|roles| roles.remove(&role_id))
                .unwrap_or(false)
        };
        if changed {
            self.notify(AclChange::GrantsChanged).await;
        }
        Ok(())
    }

    async fn revoke_roles_by_slug(&self, subject_id: Uuid, slugs: &[&str]) -> StoreResult<usize> {
        let detached = {
            let mut state = self.state.write().await;
            let ids = state.role_ids_by_slugs(slugs);
            match state.subject_roles.get_mut(&subject_id) {
                Some(roles) => ids.iter().filter(|id| roles.remove(id)).count(),
                None => 0,
            }
        };
        if detached > 0 {
            self.notify(AclChange::GrantsChanged).await;
        }
        Ok(detached)
    }

    async fn revoke_all_roles(&self, subject_id: Uuid) -> StoreResult<usize> {
        let detached = {
            let mut state = self.state.write().await;
            state
                .subject_roles
                .remove(&subject_id)
                .map(|roles| roles.len())
                .unwrap_or(0)
        };
        if detached > 0 {
            self.notify(AclChange::GrantsChanged).await;
        }
        Ok(detached)
    }

    async fn sync_roles(&self, subject_id: Uuid, role_ids: &[Uuid]) -> StoreResult<SyncChanges> {
        let changes = {
            let mut state = self.state.write().await;
            for id in role_ids {
                if !state.roles.contains_key(id) {
                    return Err(StoreError::RoleNotFound(id.to_string()));
                }
            }
            let current = state.subject_roles.entry(subject_id).or_default();
            let changes = diff(current, role_ids);
            *current = role_ids.iter().copied().collect();
            changes
        };
        if !changes.is_noop() {
            self.notify(AclChange::GrantsChanged).await;
        }
        Ok(changes)
    }

    // ------------------------------------------------------------------
    // Subject ↔ Permission (direct grants)
    // ------------------------------------------------------------------

    async fn grant_subject_permission(
        &self,
        subject_id: Uuid,
        permission_id: Uuid,
    ) -> StoreResult<()> {
        let changed = {
            let mut state = self.state.write().await;
            if !state.permissions.contains_key(&permission_id) {
                return Err(StoreError::PermissionNotFound(permission_id.to_string()));
            }
            state
                .subject_permissions
                .entry(subject_id)
                .or_default()
                .insert(permission_id)
        };
        if changed {
            self.notify(AclChange::GrantsChanged).await;
        }
        Ok(())
    }

    async fn grant_subject_permissions_by_slug(
        &self,
        subject_id: Uuid,
        slugs: &[&str],
    ) -> StoreResult<()> {
        let changed = {
            let mut state = self.state.write().await;
            let ids = state.permission_ids_by_slugs(slugs);
            let granted = state.subject_permissions.entry(subject_id).or_default();
            let mut changed = false;
            for id in ids {
                changed |= granted.insert(id);
            }
            changed
        };
        if changed {
            self.notify(AclChange::GrantsChanged).await;
        }
        Ok(())
    }

    async fn revoke_subject_permission(
        &self,
        subject_id: Uuid,
        permission_id: Uuid,
    ) -> StoreResult<()> {
        let changed = {
            let mut state = self.state.write().await;
            state
                .subject_permissions
                .get_mut(&subject_id)
                .map(|perms| perms.remove(&permission_id))
                .unwrap_or(false)
        };
        if changed {
            self.notify(AclChange::GrantsChanged).await;
        }
        Ok(())
    }

    async fn revoke_all_subject_permissions(&self, subject_id: Uuid) -> StoreResult<usize> {
        let detached = {
            let mut state = self.state.write().await;
            state
                .subject_permissions
                .remove(&subject_id)
                .map(|perms| perms.len())
                .unwrap_or(0)
        };
        if detached > 0 {
            self.notify(AclChange::GrantsChanged).await;
        }
        Ok(detached)
    }

    async fn sync_subject_permissions(
        &self,
        subject_id: Uuid,
        permission_ids: &[Uuid],
    ) -> StoreResult<SyncChanges> {
        let changes = {
            let mut state = self.state.write().await;
            for id in permission_ids {
                if !state.permissions.contains_key(id) {
                    return Err(StoreError::PermissionNotFound(id.to_string()));
                }
            }
            let current = state.subject_permissions.entry(subject_id).or_default();
            let changes = diff(current, permission_ids);
            *current = permission_ids.iter().copied().collect();
            changes
        };
        if !changes.is_noop() {
            self.notify(AclChange::GrantsChanged).await;
        }
        Ok(changes)
    }

    // ------------------------------------------------------------------
    // Subjects
    // ------------------------------------------------------------------

    async fn load_subject(&self, subject_id: Uuid) -> StoreResult<Subject> {
        let state = self.state.read().await;

        let roles = state
            .subject_roles
            .get(&subject_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.roles.get(id))
                    .map(|role| {
                        GrantedRole::new(role.clone(), state.permission_slugs_of_role(role.id))
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let direct_permission_slugs = state
            .subject_permissions
            .get(&subject_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.permissions.get(id))
                    .map(|p| p.slug.clone())
                    .collect()
            })
            .unwrap_or_default();

        let mut subject = Subject::new(subject_id);
        subject.roles = roles;
        subject.direct_permission_slugs = direct_permission_slugs;
        Ok(subject)
    }

    async fn subjects_having_roles(&self, slugs: &[&str]) -> StoreResult<Vec<Uuid>> {
        let state = self.state.read().await;
        let role_ids: BTreeSet<Uuid> = state.role_ids_by_slugs(slugs).into_iter().collect();
        Ok(state
            .subject_roles
            .iter()
            .filter(|(_, roles)| roles.intersection(&role_ids).next().is_some())
            .map(|(subject_id, _)| *subject_id)
            .collect())
    }

    // ------------------------------------------------------------------
    // Invalidation
    // ------------------------------------------------------------------

    async fn register_observer(&self, observer: Arc<dyn WriteObserver>) {
        self.observers.write().await.push(observer);
    }
}
