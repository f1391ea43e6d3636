//! Route-style guards
//!
//! Framework-agnostic check objects: each wraps the gate and turns a deny
//! into an [`AccessDenied`] payload, so an HTTP adapter only has to map
//! `Err` to a response. The parameter forms mirror route-definition
//! strings: role lists accept `,` and `|` as equivalent OR separators,
//! permission lists are comma-delimited.

use std::sync::Arc;

use acl_engine::Gate;
use acl_model::Subject;

use crate::error::AccessDenied;

/// Split a delimited parameter string, trimming entries and dropping blanks.
fn split_param(param: &str, delimiters: &[char]) -> Vec<String> {
    param
        .split(|c| delimiters.contains(&c))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Requires a single ability, resolved through the gate.
///
/// Because the check goes through the ability map, delegate abilities
/// resolve here too, not just plain permission slugs.
#[derive(Clone)]
pub struct PermissionGuard {
    gate: Arc<Gate>,
}

impl PermissionGuard {
    pub fn new(gate: Arc<Gate>) -> Self {
        Self { gate }
    }

    /// Pass iff the gate allows the ability for this principal.
    pub async fn check(
        &self,
        subject: Option<&Subject>,
        ability: &str,
    ) -> Result<(), AccessDenied> {
        if self.gate.allows(subject, ability).await {
            Ok(())
        } else {
            Err(AccessDenied::insufficient_permissions())
        }
    }
}

/// Requires at least one of the listed roles.
#[derive(Clone)]
pub struct RoleGuard {
    gate: Arc<Gate>,
}

impl RoleGuard {
    pub fn new(gate: Arc<Gate>) -> Self {
        Self { gate }
    }

    /// Pass iff the principal holds one of the roles in `param`.
    ///
    /// `param` is an OR-group: `"admin,editor"` and `"admin|editor"` are
    /// equivalent.
    pub async fn check(&self, subject: Option<&Subject>, param: &str) -> Result<(), AccessDenied> {
        let roles = split_param(param, &[',', '|']);
        let refs: Vec<&str> = roles.iter().map(String::as_str).collect();
        if self.gate.has_role(subject, &refs).await {
            Ok(())
        } else {
            Err(AccessDenied::insufficient_permissions())
        }
    }
}

/// Requires at least one of the listed permission slugs.
#[derive(Clone)]
pub struct CanAtLeastGuard {
    gate: Arc<Gate>,
}

impl CanAtLeastGuard {
    pub fn new(gate: Arc<Gate>) -> Self {
        Self { gate }
    }

    /// Pass iff the principal holds at least one slug in the
    /// comma-delimited `param`. Anonymous principals fall back to the
    /// guest role's grants.
    pub async fn check(&self, subject: Option<&Subject>, param: &str) -> Result<(), AccessDenied> {
        let permissions = split_param(param, &[',']);
        let refs: Vec<&str> = permissions.iter().map(String::as_str).collect();
        if self.gate.can_at_least(subject, &refs).await {
            Ok(())
        } else {
            Err(AccessDenied::forbidden_content())
        }
    }
}
