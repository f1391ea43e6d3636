//! # ACL Model
//!
//! Entity model and pure authorization logic for the ACL crates.
//!
//! ## Overview
//!
//! The acl-model crate defines:
//! - **Roles**: named grants identified by a unique slug
//! - **Permissions**: the catalog of grantable abilities, grouped by resource
//! - **Subjects**: loaded principal snapshots (roles plus direct grants)
//! - **Access traits**: the set-logic checks (`can`, `can_at_least`,
//!   `has_role`, `can_access`) shared by roles and subjects
//!
//! ## Architecture
//!
//! ```text
//! Subject
//!   ├─ GrantedRole ─→ Role (+ permission slugs)
//!   └─ direct permission slugs
//!
//! effective permissions = union of role grants and direct grants
//! ```
//!
//! Slugs are the identity keys: every check compares lowercase-kebab slug
//! strings, never display names. Everything here is pure computation over
//! in-memory slug collections; persistence lives in `acl-store` and the
//! cached ability map in `acl-engine`.
//!
//! ## Usage
//!
//! ```rust
//! use acl_model::{GrantedRole, HasPermissions, HasRoles, Role, Subject};
//! use uuid::Uuid;
//!
//! let admin = Role::new("Administrator", "admin");
//! let granted = GrantedRole::new(admin, vec!["create-article".into()]);
//!
//! let subject = Subject::new(Uuid::now_v7()).with_role(granted);
//! assert!(subject.has_role("admin"));
//! assert!(subject.can("create-article"));
//! assert!(subject.cannot("delete-article"));
//! ```

pub mod access;
pub mod permission;
pub mod refs;
pub mod role;
pub mod subject;

// Re-export main types for convenience
pub use access::{Accessible, HasPermissions, HasRoles};
pub use permission::{resource_bundle, slugify, title_case, Permission, PermissionSpec};
pub use refs::SlugRef;
pub use role::Role;
pub use subject::{GrantedRole, Subject};
