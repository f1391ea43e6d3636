//! Access-denied payloads
//!
//! The terminal outcome of a failed guard check. Not a bug: a denial is the
//! guard doing its job, so the type carries everything an HTTP adapter
//! needs (status, machine-readable code, human-readable description) and
//! nothing else.

use serde::Serialize;
use thiserror::Error;

/// A rejected guard check, ready to render as an API error response.
#[derive(Debug, Clone, Error, Serialize, PartialEq, Eq)]
#[error("{description}")]
pub struct AccessDenied {
    /// HTTP status the adapter should respond with
    pub status_code: u16,
    /// Stable machine-readable code
    pub code: String,
    /// Human-readable description
    pub description: String,
}

impl AccessDenied {
    /// Denial for role and single-permission guards.
    pub fn insufficient_permissions() -> Self {
        Self {
            status_code: 401,
            code: "INSUFFICIENT_PERMISSIONS".to_string(),
            description: "You are not authorized to access this resource.".to_string(),
        }
    }

    /// Denial for content gated behind a permission list.
    pub fn forbidden_content() -> Self {
        Self {
            status_code: 403,
            code: "ACCESS_DENIED".to_string(),
            description: "You are not allowed to view this content!".to_string(),
        }
    }

    /// Get HTTP status code for this denial.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &str {
        &self.code
    }

    /// The structured payload API callers receive.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "status_code": self.status_code,
                "code": self.code,
                "description": self.description,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_permissions_payload() {
        let denied = AccessDenied::insufficient_permissions();
        assert_eq!(denied.status_code(), 401);
        assert_eq!(denied.error_code(), "INSUFFICIENT_PERMISSIONS");
        assert_eq!(
            denied.to_json(),
            serde_json::json!({
                "error": {
                    "status_code": 401,
                    "code": "INSUFFICIENT_PERMISSIONS",
                    "description": "You are not authorized to access this resource.",
                }
            })
        );
    }

    #[test]
    fn test_forbidden_content_payload() {
        let denied = AccessDenied::forbidden_content();
        assert_eq!(denied.status_code(), 403);
        assert_eq!(denied.error_code(), "ACCESS_DENIED");
        assert_eq!(
            denied.to_json()["error"]["description"],
            "You are not allowed to view this content!"
        );
    }

    #[test]
    fn test_display_uses_description() {
        let denied = AccessDenied::forbidden_content();
        assert_eq!(denied.to_string(), "You are not allowed to view this content!");
    }
}
