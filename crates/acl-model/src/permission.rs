//! Permission entity
//!
//! Permissions form the catalog of grantable abilities. Each permission has
//! a unique slug (the identity key), a display name, and a free-form
//! `resource` label grouping the permissions that guard one entity type.
//!
//! A slug containing `@` is a delegate reference: instead of a plain
//! slug-membership check, the slug names an external handler and the
//! permission's *name* becomes the registered ability. See
//! `acl-engine`'s registrar for how both conventions build the ability map.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A permission row.
///
/// # Examples
///
/// ```
/// use acl_model::Permission;
///
/// let perm = Permission::new("Create Articles", "create-articles", "Articles");
/// assert_eq!(perm.slug, "create-articles");
/// assert!(!perm.is_delegate());
///
/// let delegate = Permission::new("publish-article", "ArticlePolicy@publish", "Articles");
/// assert!(delegate.is_delegate());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    /// Unique permission ID
    pub id: Uuid,

    /// Display name (becomes the ability name for delegate slugs)
    pub name: String,

    /// Unique slug (identity key; may carry an `@` delegate reference)
    pub slug: String,

    /// Free-form grouping label, typically the guarded entity type
    pub resource: String,

    /// Whether this is a system (framework-reserved) permission
    #[serde(default)]
    pub system: bool,

    /// When the permission was created
    pub created_at: DateTime<Utc>,

    /// When the permission was last updated
    pub updated_at: DateTime<Utc>,
}

impl Permission {
    /// Creates a new permission with a generated UUID v7 id.
    ///
    /// # Arguments
    ///
    /// * `name` - Display name
    /// * `slug` - Unique slug identity key
    /// * `resource` - Grouping label
    pub fn new(
        name: impl Into<String>,
        slug: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            slug: slug.into(),
            resource: resource.into(),
            system: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the permission as a system permission.
    pub fn as_system(mut self) -> Self {
        self.system = true;
        self
    }

    /// Whether the slug carries an `@` delegate handler reference.
    pub fn is_delegate(&self) -> bool {
        self.slug.contains('@')
    }
}

/// Input spec for creating a permission row.
///
/// Used by the resource bundle factory and by stores as the create payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSpec {
    /// Display name
    pub name: String,
    /// Unique slug
    pub slug: String,
    /// Grouping label
    pub resource: String,
    /// System flag
    #[serde(default)]
    pub system: bool,
}

/// The standard actions a resource bundle covers, in creation order.
const BUNDLE_ACTIONS: [(&str, &str); 5] = [
    ("viewAny", "View Any"),
    ("view", "View"),
    ("create", "Create"),
    ("update", "Update"),
    ("delete", "Delete"),
];

/// Build the five standard permission specs for a resource.
///
/// For resource `"user profiles"` this yields slugs `viewAny-user-profiles`,
/// `view-user-profiles`, `create-user-profiles`, `update-user-profiles` and
/// `delete-user-profiles`, all grouped under the Title-Cased resource label.
///
/// The factory only produces specs; the store's bundle creation treats an
/// already-existing slug as a silent skip so the factory can be re-run.
///
/// # Examples
///
/// ```
/// use acl_model::resource_bundle;
///
/// let specs = resource_bundle("Users", false);
/// assert_eq!(specs.len(), 5);
/// assert_eq!(specs[0].slug, "viewAny-users");
/// assert_eq!(specs[0].name, "View Any Users");
/// assert_eq!(specs[0].resource, "Users");
/// ```
pub fn resource_bundle(resource: &str, system: bool) -> Vec<PermissionSpec> {
    let group = title_case(resource);
    let slug = slugify(&group);

    BUNDLE_ACTIONS
        .iter()
        .map(|(action, label)| PermissionSpec {
            name: format!("{} {}", label, group),
            slug: format!("{}-{}", action, slug),
            resource: group.clone(),
            system,
        })
        .collect()
}

/// Lowercase-kebab slug of a string.
///
/// Alphanumeric runs are lowercased and joined with single dashes; every
/// other character acts as a separator.
///
/// # Examples
///
/// ```
/// use acl_model::slugify;
///
/// assert_eq!(slugify("User Profiles"), "user-profiles");
/// assert_eq!(slugify("  API   Keys "), "api-keys");
/// ```
pub fn slugify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_dash = false;

    for c in s.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    out
}

/// Title-Case each whitespace-separated word.
///
/// # Examples
///
/// ```
/// use acl_model::title_case;
///
/// assert_eq!(title_case("user profiles"), "User Profiles");
/// ```
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_creation() {
        let perm = Permission::new("Create Articles", "create-articles", "Articles");
        assert_eq!(perm.name, "Create Articles");
        assert_eq!(perm.slug, "create-articles");
        assert_eq!(perm.resource, "Articles");
        assert!(!perm.system);
        assert!(!perm.is_delegate());
    }

    #[test]
    fn test_delegate_detection() {
        let perm = Permission::new("publish-article", "ArticlePolicy@publish", "Articles");
        assert!(perm.is_delegate());
    }

    #[test]
    fn test_resource_bundle_shape() {
        let specs = resource_bundle("Users", false);

        let slugs: Vec<&str> = specs.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(
            slugs,
            vec![
                "viewAny-users",
                "view-users",
                "create-users",
                "update-users",
                "delete-users"
            ]
        );
        assert!(specs.iter().all(|s| s.resource == "Users"));
        assert!(specs.iter().all(|s| !s.system));
        assert_eq!(specs[2].name, "Create Users");
    }

    #[test]
    fn test_resource_bundle_normalizes_label() {
        let specs = resource_bundle("user profiles", true);
        assert_eq!(specs[1].slug, "view-user-profiles");
        assert_eq!(specs[1].name, "View User Profiles");
        assert_eq!(specs[1].resource, "User Profiles");
        assert!(specs[1].system);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Users"), "users");
        assert_eq!(slugify("User Profiles"), "user-profiles");
        assert_eq!(slugify("api/keys & tokens"), "api-keys-tokens");
        assert_eq!(slugify("  trailing  "), "trailing");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("users"), "Users");
        assert_eq!(title_case("user profiles"), "User Profiles");
        assert_eq!(title_case("API keys"), "Api Keys");
    }
}
