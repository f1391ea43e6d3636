//! Ability map
//!
//! The derived mapping from ability name to policy check, rebuilt from the
//! permission store on every invalidation. Two naming conventions coexist:
//!
//! - **slug-as-ability**: the permission slug is the ability name and the
//!   policy is "the principal holds this slug via any role or direct grant"
//! - **explicit-handler-ability**: a slug containing `@` names a delegate
//!   handler; the permission's *name* becomes the ability and the slug is
//!   kept as the opaque handler reference (the escape hatch for custom
//!   logic)
//!
//! A published map is an immutable snapshot; rebuilds produce a new map and
//! swap it whole (see [`crate::gate::Gate`]).

use std::collections::HashMap;

use acl_store::PermissionWithRoles;

/// The check backing a registered ability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Policy {
    /// Principal must hold this permission slug.
    SlugMembership(String),
    /// Defer to an external handler named by the reference (e.g.
    /// `"ArticlePolicy@publish"`).
    Delegate(String),
}

/// Immutable ability-name → policy snapshot.
#[derive(Debug, Clone, Default)]
pub struct AbilityMap {
    abilities: HashMap<String, Policy>,
}

impl AbilityMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the map from the permission list, one entry per permission.
    pub fn from_permissions(permissions: &[PermissionWithRoles]) -> Self {
        let mut map = Self::new();
        for entry in permissions {
            let permission = &entry.permission;
            if permission.is_delegate() {
                map.define(
                    permission.name.clone(),
                    Policy::Delegate(permission.slug.clone()),
                );
            } else {
                map.define(
                    permission.slug.clone(),
                    Policy::SlugMembership(permission.slug.clone()),
                );
            }
        }
        map
    }

    /// Register an ability.
    pub fn define(&mut self, ability: impl Into<String>, policy: Policy) {
        self.abilities.insert(ability.into(), policy);
    }

    /// The policy registered for an ability, if any.
    pub fn policy(&self, ability: &str) -> Option<&Policy> {
        self.abilities.get(ability)
    }

    /// Number of registered abilities.
    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    /// Whether no abilities are registered.
    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}
