//! Subject snapshots
//!
//! A subject is the principal being authorized. The store materializes a
//! subject as a snapshot of its roles (each with the permission slugs it
//! grants) and its direct permission grants; the snapshot then answers
//! checks without further I/O.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::{HasPermissions, HasRoles};
use crate::role::Role;

/// A role together with the permission slugs it grants.
///
/// This is the eager-loaded form a subject holds: the role row plus its
/// attached permission slugs, so checks stay pure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantedRole {
    /// The role row
    pub role: Role,
    /// Slugs of the permissions attached to the role
    pub permission_slugs: Vec<String>,
}

impl GrantedRole {
    /// Pair a role with its granted permission slugs.
    pub fn new(role: Role, permission_slugs: Vec<String>) -> Self {
        Self {
            role,
            permission_slugs,
        }
    }
}

impl HasPermissions for GrantedRole {
    fn permission_slugs(&self) -> Vec<String> {
        self.permission_slugs.clone()
    }
}

/// A loaded principal snapshot.
///
/// The effective permission set is the union of all role grants and the
/// direct grants, deduplicated. Snapshots are plain values; after any
/// role/permission write the store produces a fresh one (see the session
/// refresh in `acl-engine`).
///
/// # Examples
///
/// ```
/// use acl_model::{GrantedRole, HasPermissions, Role, Subject};
/// use uuid::Uuid;
///
/// let editor = GrantedRole::new(Role::new("Editor", "editor"), vec!["update-article".into()]);
/// let subject = Subject::new(Uuid::now_v7())
///     .with_role(editor)
///     .with_direct_permission("export-report");
///
/// assert!(subject.can("update-article"));
/// assert!(subject.can("export-report"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    /// Stable principal identifier
    pub id: Uuid,

    /// Roles held by the subject, with their grants loaded
    #[serde(default)]
    pub roles: Vec<GrantedRole>,

    /// Permission slugs granted directly to the subject
    #[serde(default)]
    pub direct_permission_slugs: Vec<String>,
}

impl Subject {
    /// Creates an empty snapshot for the given principal id.
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            roles: Vec::new(),
            direct_permission_slugs: Vec::new(),
        }
    }

    /// Add a granted role to the snapshot.
    pub fn with_role(mut self, role: GrantedRole) -> Self {
        self.roles.push(role);
        self
    }

    /// Add a direct permission grant to the snapshot.
    pub fn with_direct_permission(mut self, slug: impl Into<String>) -> Self {
        self.direct_permission_slugs.push(slug.into());
        self
    }
}

impl HasRoles for Subject {
    fn role_slugs(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.role.slug.clone()).collect()
    }
}

impl HasPermissions for Subject {
    /// Union of role grants and direct grants, deduplicated in first-seen
    /// order (direct grants first, as the original merge did).
    fn permission_slugs(&self) -> Vec<String> {
        let mut slugs: Vec<String> = Vec::new();

        for slug in self
            .direct_permission_slugs
            .iter()
            .chain(self.roles.iter().flat_map(|r| r.permission_slugs.iter()))
        {
            if !slugs.iter().any(|s| s == slug) {
                slugs.push(slug.clone());
            }
        }

        slugs
    }
}
