//! Store interface
//!
//! `AclStore` is the persistence boundary: role/permission CRUD, slug and
//! resource queries, the many-to-many association protocol, and subject
//! snapshot loading. Implementations also carry the write-boundary
//! invalidation contract: after every committing role/permission write they
//! notify registered [`WriteObserver`]s *before* the write call returns, so
//! the cached ability map is rebuilt as one logical unit with the write.
//!
//! Resolution policy: single references (one slug, one row id) fail loudly
//! when they do not resolve; bulk slug/resource forms resolve to zero or
//! more rows and apply per matched row, silently doing nothing on zero
//! matches.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use acl_model::{Permission, PermissionSpec, Role, Subject};

use crate::error::StoreResult;

/// A permission row with its attached roles eagerly loaded.
///
/// This is the unit the registrar caches: one entry per permission, with
/// the roles that grant it, so ability-map rebuilds need a single store
/// read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionWithRoles {
    /// The permission row
    pub permission: Permission,
    /// Roles the permission is attached to
    pub roles: Vec<Role>,
}

/// Result of a `sync` operation: the set-diff actually applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncChanges {
    /// Ids newly attached
    pub attached: Vec<Uuid>,
    /// Ids detached
    pub detached: Vec<Uuid>,
    /// Ids already attached and left in place
    pub unchanged: Vec<Uuid>,
}

impl SyncChanges {
    /// Whether the sync changed nothing.
    pub fn is_noop(&self) -> bool {
        self.attached.is_empty() && self.detached.is_empty()
    }
}

/// A committed write that invalidates derived authorization state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AclChange {
    /// A role row was created or updated
    RoleSaved,
    /// A role row was deleted
    RoleDeleted,
    /// A permission row was created or updated
    PermissionSaved,
    /// A permission row was deleted
    PermissionDeleted,
    /// An association (role↔permission, subject↔role, subject↔permission) changed
    GrantsChanged,
}

/// Observer notified synchronously after every committing ACL write.
///
/// The registrar in `acl-engine` implements this to run its
/// evict-then-rebuild cycle before control returns to the writer.
#[async_trait]
pub trait WriteObserver: Send + Sync {
    /// Handle a committed change.
    async fn acl_changed(&self, change: AclChange);
}

/// Persistence boundary for roles, permissions and their associations.
#[async_trait]
pub trait AclStore: Send + Sync {
    // ------------------------------------------------------------------
    // Roles
    // ------------------------------------------------------------------

    /// Persist a new role. Fails with `DuplicateSlug` if the slug is taken.
    async fn create_role(&self, role: Role) -> StoreResult<Role>;

    /// Update an existing role row (matched by id).
    async fn update_role(&self, role: Role) -> StoreResult<Role>;

    /// Delete a role and its associations. Returns whether a row existed.
    async fn delete_role(&self, role_id: Uuid) -> StoreResult<bool>;

    /// Find a role by slug, failing loudly when absent.
    async fn find_role_by_slug(&self, slug: &str) -> StoreResult<Role>;

    /// Roles whose slug is in the given list (zero matches allowed).
    async fn roles_by_slugs(&self, slugs: &[&str]) -> StoreResult<Vec<Role>>;

    /// A role by slug together with the permission slugs it grants.
    async fn load_role_grants(&self, slug: &str) -> StoreResult<acl_model::GrantedRole>;

    // ------------------------------------------------------------------
    // Permissions
    // ------------------------------------------------------------------

    /// Persist a new permission. Fails with `DuplicateSlug` if the slug is taken.
    async fn create_permission(&self, spec: PermissionSpec) -> StoreResult<Permission>;

    /// Update an existing permission row (matched by id).
    async fn update_permission(&self, permission: Permission) -> StoreResult<Permission>;

    /// Delete a permission and its associations. Returns whether a row existed.
    async fn delete_permission(&self, permission_id: Uuid) -> StoreResult<bool>;

    /// Create the standard five-permission bundle for a resource.
    ///
    /// Specs whose slug already exists are skipped silently; only the rows
    /// actually created are returned. Re-running for the same resource is a
    /// no-op.
    async fn create_resource_permissions(
        &self,
        resource: &str,
        system: bool,
    ) -> StoreResult<Vec<Permission>>;

    /// Find a permission by slug, failing loudly when absent.
    async fn find_permission_by_slug(&self, slug: &str) -> StoreResult<Permission>;

    /// Permissions whose slug is in the given list (zero matches allowed).
    async fn permissions_by_slugs(&self, slugs: &[&str]) -> StoreResult<Vec<Permission>>;

    /// Permissions whose resource label is in the given list.
    async fn permissions_by_resource(&self, resources: &[&str]) -> StoreResult<Vec<Permission>>;

    /// All permissions with their roles eagerly loaded (registrar read).
    async fn permissions_with_roles(&self) -> StoreResult<Vec<PermissionWithRoles>>;

    // ------------------------------------------------------------------
    // Role ↔ Permission
    // ------------------------------------------------------------------

    /// Attach a permission to a role. Already-attached is a no-op.
    async fn grant_permission(&self, role_id: Uuid, permission_id: Uuid) -> StoreResult<()>;

    /// Attach every permission matching the given slugs.
    async fn grant_permissions_by_slug(&self, role_id: Uuid, slugs: &[&str]) -> StoreResult<()>;

    /// Attach every permission under the given resource labels.
    async fn grant_permissions_by_resource(
        &self,
        role_id: Uuid,
        resources: &[&str],
    ) -> StoreResult<()>;

    /// Detach a permission from a role. Absent association is a no-op.
    async fn revoke_permission(&self, role_id: Uuid, permission_id: Uuid) -> StoreResult<()>;

    /// Detach every permission matching the given slugs. Returns the count detached.
    async fn revoke_permissions_by_slug(&self, role_id: Uuid, slugs: &[&str])
        -> StoreResult<usize>;

    /// Detach every permission under the given resource labels.
    async fn revoke_permissions_by_resource(
        &self,
        role_id: Uuid,
        resources: &[&str],
    ) -> StoreResult<usize>;

    /// Detach all permissions from a role. Returns the count detached.
    async fn revoke_all_permissions(&self, role_id: Uuid) -> StoreResult<usize>;

    /// Replace the role's permission set with exactly the given ids.
    async fn sync_permissions(
        &self,
        role_id: Uuid,
        permission_ids: &[Uuid],
    ) -> StoreResult<SyncChanges>;

    // ------------------------------------------------------------------
    // Subject ↔ Role
    // ------------------------------------------------------------------

    /// Attach a role to a subject by row id. Already-attached is a no-op.
    async fn attach_role(&self, subject_id: Uuid, role_id: Uuid) -> StoreResult<()>;

    /// Attach a role to a subject by slug (single reference, fail-loud).
    async fn attach_role_by_slug(&self, subject_id: Uuid, slug: &str) -> StoreResult<()>;

    /// Detach a role from a subject. Absent association is a no-op.
    async fn revoke_role(&self, subject_id: Uuid, role_id: Uuid) -> StoreResult<()>;

    /// Detach every role matching the given slugs. Returns the count detached.
    async fn revoke_roles_by_slug(&self, subject_id: Uuid, slugs: &[&str]) -> StoreResult<usize>;

    /// Detach all roles from a subject. Returns the count detached.
    async fn revoke_all_roles(&self, subject_id: Uuid) -> StoreResult<usize>;

    /// Replace the subject's role set with exactly the given ids.
    async fn sync_roles(&self, subject_id: Uuid, role_ids: &[Uuid]) -> StoreResult<SyncChanges>;

    // ------------------------------------------------------------------
    // Subject ↔ Permission (direct grants)
    // ------------------------------------------------------------------

    /// Grant a permission directly to a subject. Already-granted is a no-op.
    async fn grant_subject_permission(
        &self,
        subject_id: Uuid,
        permission_id: Uuid,
    ) -> StoreResult<()>;

    /// Grant every permission matching the given slugs directly to a subject.
    async fn grant_subject_permissions_by_slug(
        &self,
        subject_id: Uuid,
        slugs: &[&str],
    ) -> StoreResult<()>;

    /// Revoke a direct grant. Absent association is a no-op.
    async fn revoke_subject_permission(
        &self,
        subject_id: Uuid,
        permission_id: Uuid,
    ) -> StoreResult<()>;

    /// Revoke all direct grants from a subject. Returns the count detached.
    async fn revoke_all_subject_permissions(&self, subject_id: Uuid) -> StoreResult<usize>;

    /// Replace the subject's direct grants with exactly the given ids.
    async fn sync_subject_permissions(
        &self,
        subject_id: Uuid,
        permission_ids: &[Uuid],
    ) -> StoreResult<SyncChanges>;

    // ------------------------------------------------------------------
    // Subjects
    // ------------------------------------------------------------------

    /// Load a subject snapshot: roles with their grants, plus direct grants.
    ///
    /// Subjects live outside this store; an id with no associations yields
    /// an empty snapshot rather than an error.
    async fn load_subject(&self, subject_id: Uuid) -> StoreResult<Subject>;

    /// Ids of subjects holding at least one of the given role slugs.
    async fn subjects_having_roles(&self, slugs: &[&str]) -> StoreResult<Vec<Uuid>>;

    // ------------------------------------------------------------------
    // Invalidation
    // ------------------------------------------------------------------

    /// Register an observer notified after every committing write.
    async fn register_observer(&self, observer: Arc<dyn WriteObserver>);
}
