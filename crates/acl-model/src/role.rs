//! Role entity
//!
//! A role is a named bundle of permissions identified by a unique slug.
//! Role↔permission and subject↔role associations are held by the store;
//! this module only defines the row itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A role row.
///
/// The `slug` is the stable identity key used in every authorization check;
/// `name` is display-only. The `system` flag marks framework-reserved roles
/// by convention (it is informational, not enforced).
///
/// # Examples
///
/// ```
/// use acl_model::Role;
///
/// let role = Role::new("Administrator", "admin").with_description("Full access");
/// assert_eq!(role.slug, "admin");
/// assert!(!role.system);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Unique role ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Unique slug (lowercase-kebab identity key)
    pub slug: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Whether this is a system (framework-reserved) role
    #[serde(default)]
    pub system: bool,

    /// When the role was created
    pub created_at: DateTime<Utc>,

    /// When the role was last updated
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Creates a new role with a generated UUID v7 id and current timestamps.
    ///
    /// # Arguments
    ///
    /// * `name` - Display name
    /// * `slug` - Unique slug identity key
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            slug: slug.into(),
            description: None,
            system: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the role description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the role as a system role.
    pub fn as_system(mut self) -> Self {
        self.system = true;
        self
    }
}
