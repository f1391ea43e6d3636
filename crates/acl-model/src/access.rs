//! Access-check traits
//!
//! The pure set logic behind every authorization decision. Anything that can
//! produce its effective permission slugs gets the `can` family; anything
//! that can produce its role slugs gets the `has_role` family. Subjects
//! implement both and thereby the combined `can_access` check.
//!
//! The list semantics are deliberately asymmetric and must stay that way:
//! `can_all` is an AND over the whole list (empty list vacuously true),
//! while `can_at_least` and `has_any_role` are ORs (empty list false).

use crate::refs::SlugRef;

/// Checks over an effective permission-slug set.
pub trait HasPermissions {
    /// The effective permission slugs, deduplicated.
    fn permission_slugs(&self) -> Vec<String>;

    /// Whether the given permission slug is held.
    fn can(&self, permission: &str) -> bool {
        self.permission_slugs().iter().any(|s| s == permission)
    }

    /// Whether the given permission slug is not held.
    fn cannot(&self, permission: &str) -> bool {
        !self.can(permission)
    }

    /// Whether *every* slug in the list is held (AND semantics).
    ///
    /// An empty list is vacuously true.
    fn can_all(&self, permissions: &[&str]) -> bool {
        let held = self.permission_slugs();
        permissions.iter().all(|p| held.iter().any(|s| s == p))
    }

    /// Whether *at least one* slug in the list is held (OR semantics).
    ///
    /// An empty list is false.
    fn can_at_least(&self, permissions: &[&str]) -> bool {
        let held = self.permission_slugs();
        permissions.iter().any(|p| held.iter().any(|s| s == p))
    }
}

/// Checks over a role-slug set.
pub trait HasRoles {
    /// The slugs of all held roles.
    fn role_slugs(&self) -> Vec<String>;

    /// Whether the given role slug is held.
    fn has_role(&self, role: &str) -> bool {
        self.role_slugs().iter().any(|s| s == role)
    }

    /// Whether at least one of the given role slugs is held (OR semantics).
    fn has_any_role(&self, roles: &[&str]) -> bool {
        let held = self.role_slugs();
        roles.iter().any(|r| held.iter().any(|s| s == r))
    }

    /// Whether the given typed role reference is held.
    ///
    /// Accepts anything with a declared slug mapping, e.g. an application
    /// role enum. See [`SlugRef`].
    fn has_role_ref<R: SlugRef>(&self, role: &R) -> bool
    where
        Self: Sized,
    {
        self.has_role(&role.as_slug())
    }
}

/// Combined permission-or-role access check.
///
/// Blanket-implemented for everything that has both permissions and roles.
pub trait Accessible: HasPermissions + HasRoles {
    /// Whether any entry of `acl` matches a held permission *or* role slug.
    ///
    /// This is the coarse-grained check used for menu items and route
    /// groups where either kind of grant should open the door.
    fn can_access(&self, acl: &[&str]) -> bool {
        self.can_at_least(acl) || self.has_any_role(acl)
    }
}

impl<T: HasPermissions + HasRoles> Accessible for T {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        permissions: Vec<String>,
        roles: Vec<String>,
    }

    impl HasPermissions for Fixture {
        fn permission_slugs(&self) -> Vec<String> {
            self.permissions.clone()
        }
    }

    impl HasRoles for Fixture {
        fn role_slugs(&self) -> Vec<String> {
            self.roles.clone()
        }
    }

    fn fixture() -> Fixture {
        Fixture {
            permissions: vec!["create-article".into(), "update-article".into()],
            roles: vec!["admin".into()],
        }
    }

    #[test]
    fn test_can_single() {
        let f = fixture();
        assert!(f.can("create-article"));
        assert!(!f.can("delete-article"));
        assert!(f.cannot("delete-article"));
    }

    #[test]
    fn test_can_all_requires_every_slug() {
        let f = fixture();
        assert!(f.can_all(&["create-article", "update-article"]));
        assert!(!f.can_all(&["create-article", "delete-article"]));
    }

    #[test]
    fn test_can_all_empty_is_vacuously_true() {
        assert!(fixture().can_all(&[]));
    }

    #[test]
    fn test_can_at_least_is_or() {
        let f = fixture();
        assert!(f.can_at_least(&["create-article", "delete-article"]));
        assert!(!f.can_at_least(&["delete-article", "publish-article"]));
    }

    #[test]
    fn test_can_at_least_empty_is_false() {
        assert!(!fixture().can_at_least(&[]));
    }

    #[test]
    fn test_has_role() {
        let f = fixture();
        assert!(f.has_role("admin"));
        assert!(!f.has_role("editor"));
        assert!(f.has_any_role(&["admin", "editor"]));
        assert!(!f.has_any_role(&["editor", "author"]));
    }

    #[test]
    fn test_can_access_matches_permission_or_role() {
        let f = fixture();
        // Permission hit only.
        assert!(f.can_access(&["create-article"]));
        // Role hit only.
        assert!(f.can_access(&["admin"]));
        // Neither.
        assert!(!f.can_access(&["editor", "delete-article"]));
    }
}
