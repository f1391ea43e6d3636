//! Template-conditional predicates
//!
//! Boolean wrappers over the gate for template engines and view helpers:
//! show or hide a fragment, never reject a request. All three apply the
//! anonymous fallback, so a login-less visitor sees what the guest role
//! grants.

use acl_engine::Gate;
use acl_model::{HasRoles, Subject};

/// Whether the principal holds at least one of the permission slugs.
pub async fn can_at_least(gate: &Gate, subject: Option<&Subject>, permissions: &[&str]) -> bool {
    gate.can_at_least(subject, permissions).await
}

/// Whether the principal holds at least one of the role slugs.
pub async fn has_role(gate: &Gate, subject: Option<&Subject>, roles: &[&str]) -> bool {
    gate.has_role(subject, roles).await
}

/// Whether the principal's role set is exactly the single given role.
///
/// Stricter than [`has_role`]: a subject holding `admin` *and* `editor`
/// is not "exactly an editor". Anonymous principals are exactly the
/// guest role.
pub async fn is_role(gate: &Gate, subject: Option<&Subject>, role: &str) -> bool {
    match subject {
        Some(subject) => {
            let slugs = subject.role_slugs();
            slugs.len() == 1 && slugs[0] == role
        }
        None => gate.has_role(None, &[role]).await,
    }
}
