//! Engine configuration
//!
//! Mirrors the consumer-facing configuration surface: the cache key and
//! enabled flag for the permission list, and the slug of the distinguished
//! guest role used for anonymous checks.

/// Configuration for the gate and registrar.
#[derive(Debug, Clone)]
pub struct AclConfig {
    /// Whether the permission list is cached between rebuilds (default: true).
    pub cache_enabled: bool,

    /// Cache key for the permission list (default: "permissions.policies").
    pub cache_key: String,

    /// Slug of the role evaluated for anonymous principals (default: "guest").
    pub guest_role_slug: String,
}

impl Default for AclConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            cache_key: "permissions.policies".to_string(),
            guest_role_slug: "guest".to_string(),
        }
    }
}
