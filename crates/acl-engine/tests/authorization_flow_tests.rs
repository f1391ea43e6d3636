//! End-to-end tests for the authorization pipeline.
//!
//! These tests exercise the full wiring: store writes notify the registrar,
//! which evicts the cached permission list, rebuilds the ability map,
//! publishes it to the gate and refreshes the attached session. Checks then
//! run against the fresh snapshots without any manual rebuild step.
//!
//! Covered flows:
//! 1. grant/revoke convergence within one process
//! 2. AND vs OR list semantics through a realistic role setup
//! 3. resource permission bundles feeding the ability map
//! 4. typed role references vs raw slugs
//! 5. delegate abilities behind a resolver
//! 6. anonymous checks via the guest role
//! 7. fail-open registration when the store is down

use std::sync::Arc;
use uuid::Uuid;

use acl_engine::{bootstrap, AclConfig, Gate, GateRegistrar, MemoryCache, Session};
use acl_model::{Accessible, HasPermissions, HasRoles, PermissionSpec, Role, SlugRef, Subject};
use acl_store::{AclStore, MemoryStore, StoreError, StoreResult};

/// Test fixture wiring a fresh store, cache, gate, registrar and session.
struct TestFixture {
    store: Arc<MemoryStore>,
    gate: Arc<Gate>,
    registrar: Arc<GateRegistrar>,
    session: Arc<Session>,
}

impl TestFixture {
    async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let (gate, registrar) = bootstrap(
            store.clone(),
            Arc::new(MemoryCache::new()),
            AclConfig::default(),
        )
        .await;
        let session = Arc::new(Session::new(store.clone()));
        registrar.attach_session(session.clone()).await;
        Self {
            store,
            gate,
            registrar,
            session,
        }
    }

    /// Create a permission row with the slug doubling as the name.
    async fn permission(&self, slug: &str, resource: &str) -> acl_model::Permission {
        self.store
            .create_permission(PermissionSpec {
                name: slug.to_string(),
                slug: slug.to_string(),
                resource: resource.to_string(),
                system: false,
            })
            .await
            .unwrap()
    }

    /// Create a role and attach the given permission slugs to it.
    async fn role_with(&self, name: &str, slug: &str, permissions: &[&str]) -> Role {
        let role = self.store.create_role(Role::new(name, slug)).await.unwrap();
        for permission in permissions {
            self.permission(permission, "Articles").await;
        }
        self.store
            .grant_permissions_by_slug(role.id, permissions)
            .await
            .unwrap();
        role
    }
}

// =============================================================================
// 1. Grant/revoke convergence
// =============================================================================

/// A revoke committed mid-session must flip the outcome of the same check
/// without the caller re-authenticating: the registrar refreshes the
/// session's subject as part of the write.
#[tokio::test]
async fn test_revoke_flips_check_within_session() {
    let fixture = TestFixture::new().await;
    let admin = fixture
        .role_with("Administrator", "admin", &["create-article"])
        .await;

    let user_id = Uuid::now_v7();
    fixture.store.attach_role(user_id, admin.id).await.unwrap();
    fixture.session.login(user_id).await.unwrap();

    let before = fixture.session.subject().await.unwrap();
    assert!(fixture.gate.allows(Some(&before), "create-article").await);

    fixture
        .store
        .revoke_permissions_by_slug(admin.id, &["create-article"])
        .await
        .unwrap();

    // No re-login; the refreshed snapshot already lacks the grant.
    let after = fixture.session.subject().await.unwrap();
    assert!(fixture.gate.denies(Some(&after), "create-article").await);
}

#[tokio::test]
async fn test_new_permission_is_checkable_immediately() {
    let fixture = TestFixture::new().await;
    assert!(fixture.gate.abilities().await.is_empty());

    fixture.permission("view-article", "Articles").await;
    assert_eq!(fixture.gate.abilities().await.len(), 1);

    let subject = Subject::new(Uuid::now_v7()).with_direct_permission("view-article");
    assert!(fixture.gate.allows(Some(&subject), "view-article").await);
}

// =============================================================================
// 2. AND vs OR list semantics
// =============================================================================

#[tokio::test]
async fn test_list_semantics_through_loaded_subject() {
    let fixture = TestFixture::new().await;
    let admin = fixture
        .role_with("Administrator", "admin", &["create-article", "update-article"])
        .await;

    let user_id = Uuid::now_v7();
    fixture.store.attach_role(user_id, admin.id).await.unwrap();
    let subject = fixture.store.load_subject(user_id).await.unwrap();

    // OR passes on a partial match.
    assert!(subject.can_at_least(&["create-article", "delete-article"]));
    assert!(
        fixture
            .gate
            .can_at_least(Some(&subject), &["create-article", "delete-article"])
            .await
    );

    // AND requires every slug.
    assert!(subject.can_all(&["create-article", "update-article"]));
    assert!(!subject.can_all(&["create-article", "delete-article"]));

    // Mixed ACL matches on either the role or a permission.
    assert!(subject.can_access(&["admin"]));
    assert!(
        fixture
            .gate
            .can_access(Some(&subject), &["delete-article", "admin"])
            .await
    );
    assert!(
        !fixture
            .gate
            .can_access(Some(&subject), &["delete-article", "editor"])
            .await
    );
}

// =============================================================================
// 3. Resource bundles
// =============================================================================

#[tokio::test]
async fn test_resource_bundle_registers_five_abilities() {
    let fixture = TestFixture::new().await;

    let created = fixture
        .store
        .create_resource_permissions("Blog Posts", false)
        .await
        .unwrap();
    assert_eq!(created.len(), 5);

    let map = fixture.gate.abilities().await;
    for ability in [
        "viewAny-blog-posts",
        "view-blog-posts",
        "create-blog-posts",
        "update-blog-posts",
        "delete-blog-posts",
    ] {
        assert!(map.policy(ability).is_some(), "missing ability {ability}");
    }

    // Re-running the bundle creates nothing new.
    let repeat = fixture
        .store
        .create_resource_permissions("Blog Posts", false)
        .await
        .unwrap();
    assert!(repeat.is_empty());
    assert_eq!(fixture.gate.abilities().await.len(), 5);
}

// =============================================================================
// 4. Typed role references
// =============================================================================

enum AppRole {
    Admin,
    Editor,
}

impl SlugRef for AppRole {
    fn as_slug(&self) -> String {
        match self {
            AppRole::Admin => "admin".to_string(),
            AppRole::Editor => "editor".to_string(),
        }
    }
}

/// Attaching by a typed reference and by its raw slug must be
/// indistinguishable to every downstream check.
#[tokio::test]
async fn test_typed_reference_equivalent_to_raw_slug() {
    let fixture = TestFixture::new().await;
    fixture.role_with("Administrator", "admin", &[]).await;

    let by_enum = Uuid::now_v7();
    let by_slug = Uuid::now_v7();
    fixture
        .store
        .attach_role_by_slug(by_enum, &AppRole::Admin.as_slug())
        .await
        .unwrap();
    fixture
        .store
        .attach_role_by_slug(by_slug, "admin")
        .await
        .unwrap();

    let first = fixture.store.load_subject(by_enum).await.unwrap();
    let second = fixture.store.load_subject(by_slug).await.unwrap();
    assert_eq!(first.role_slugs(), second.role_slugs());
    assert!(first.has_role_ref(&AppRole::Admin));
    assert!(!first.has_role_ref(&AppRole::Editor));
    assert!(second.has_role("admin"));
}

// =============================================================================
// 5. Delegate abilities
// =============================================================================

#[tokio::test]
async fn test_delegate_ability_routes_through_resolver() {
    let fixture = TestFixture::new().await;
    fixture
        .store
        .create_permission(PermissionSpec {
            name: "publish-article".to_string(),
            slug: "ArticlePolicy@publish".to_string(),
            resource: "Articles".to_string(),
            system: false,
        })
        .await
        .unwrap();

    let subject = Subject::new(Uuid::now_v7());

    // No resolver installed: the ability exists but denies.
    assert!(fixture.gate.denies(Some(&subject), "publish-article").await);

    fixture
        .gate
        .set_delegate_resolver(Arc::new(|handler, _subject| {
            handler == "ArticlePolicy@publish"
        }))
        .await;
    assert!(fixture.gate.allows(Some(&subject), "publish-article").await);
}

// =============================================================================
// 6. Guest fallback
// =============================================================================

#[tokio::test]
async fn test_anonymous_checks_fall_back_to_guest_role() {
    let fixture = TestFixture::new().await;
    fixture
        .role_with("Guest", "guest", &["view-article"])
        .await;

    assert!(fixture.gate.allows(None, "view-article").await);
    assert!(!fixture.gate.allows(None, "create-article").await);
    assert!(fixture.gate.has_role(None, &["guest"]).await);
    assert!(!fixture.gate.has_role(None, &["admin"]).await);
    assert!(fixture.gate.can_access(None, &["guest"]).await);
    assert!(fixture.gate.can_access(None, &["view-article"]).await);
}

// =============================================================================
// 7. Fail-open registration
// =============================================================================

/// Store that refuses every read, standing in for a backend outage.
struct DownStore;

macro_rules! down {
    () => {
        Err(StoreError::Unavailable("connection refused".to_string()))
    };
}

#[async_trait::async_trait]
impl AclStore for DownStore {
    async fn create_role(&self, _: Role) -> StoreResult<Role> {
        down!()
    }
    async fn update_role(&self, _: Role) -> StoreResult<Role> {
        down!()
    }
    async fn delete_role(&self, _: Uuid) -> StoreResult<bool> {
        down!()
    }
    async fn find_role_by_slug(&self, _: &str) -> StoreResult<Role> {
        down!()
    }
    async fn roles_by_slugs(&self, _: &[&str]) -> StoreResult<Vec<Role>> {
        down!()
    }
    async fn load_role_grants(&self, _: &str) -> StoreResult<acl_model::GrantedRole> {
        down!()
    }
    async fn create_permission(&self, _: PermissionSpec) -> StoreResult<acl_model::Permission> {
        down!()
    }
    async fn update_permission(
        &self,
        _: acl_model::Permission,
    ) -> StoreResult<acl_model::Permission> {
        down!()
    }
    async fn delete_permission(&self, _: Uuid) -> StoreResult<bool> {
        down!()
    }
    async fn create_resource_permissions(
        &self,
        _: &str,
        _: bool,
    ) -> StoreResult<Vec<acl_model::Permission>> {
        down!()
    }
    async fn find_permission_by_slug(&self, _: &str) -> StoreResult<acl_model::Permission> {
        down!()
    }
    async fn permissions_by_slugs(&self, _: &[&str]) -> StoreResult<Vec<acl_model::Permission>> {
        down!()
    }
    async fn permissions_by_resource(
        &self,
        _: &[&str],
    ) -> StoreResult<Vec<acl_model::Permission>> {
        down!()
    }
    async fn permissions_with_roles(&self) -> StoreResult<Vec<acl_store::PermissionWithRoles>> {
        down!()
    }
    async fn grant_permission(&self, _: Uuid, _: Uuid) -> StoreResult<()> {
        down!()
    }
    async fn grant_permissions_by_slug(&self, _: Uuid, _: &[&str]) -> StoreResult<()> {
        down!()
    }
    async fn grant_permissions_by_resource(&self, _: Uuid, _: &[&str]) -> StoreResult<()> {
        down!()
    }
    async fn revoke_permission(&self, _: Uuid, _: Uuid) -> StoreResult<()> {
        down!()
    }
    async fn revoke_permissions_by_slug(&self, _: Uuid, _: &[&str]) -> StoreResult<usize> {
        down!()
    }
    async fn revoke_permissions_by_resource(&self, _: Uuid, _: &[&str]) -> StoreResult<usize> {
        down!()
    }
    async fn revoke_all_permissions(&self, _: Uuid) -> StoreResult<usize> {
        down!()
    }
    async fn sync_permissions(&self, _: Uuid, _: &[Uuid]) -> StoreResult<acl_store::SyncChanges> {
        down!()
    }
    async fn attach_role(&self, _: Uuid, _: Uuid) -> StoreResult<()> {
        down!()
    }
    async fn attach_role_by_slug(&self, _: Uuid, _: &str) -> StoreResult<()> {
        down!()
    }
    async fn revoke_role(&self, _: Uuid, _: Uuid) -> StoreResult<()> {
        down!()
    }
    async fn revoke_roles_by_slug(&self, _: Uuid, _: &[&str]) -> StoreResult<usize> {
        down!()
    }
    async fn revoke_all_roles(&self, _: Uuid) -> StoreResult<usize> {
        down!()
    }
    async fn sync_roles(&self, _: Uuid, _: &[Uuid]) -> StoreResult<acl_store::SyncChanges> {
        down!()
    }
    async fn grant_subject_permission(&self, _: Uuid, _: Uuid) -> StoreResult<()> {
        down!()
    }
    async fn grant_subject_permissions_by_slug(&self, _: Uuid, _: &[&str]) -> StoreResult<()> {
        down!()
    }
    async fn revoke_subject_permission(&self, _: Uuid, _: Uuid) -> StoreResult<()> {
        down!()
    }
    async fn revoke_all_subject_permissions(&self, _: Uuid) -> StoreResult<usize> {
        down!()
    }
    async fn sync_subject_permissions(
        &self,
        _: Uuid,
        _: &[Uuid],
    ) -> StoreResult<acl_store::SyncChanges> {
        down!()
    }
    async fn load_subject(&self, _: Uuid) -> StoreResult<Subject> {
        down!()
    }
    async fn subjects_having_roles(&self, _: &[&str]) -> StoreResult<Vec<Uuid>> {
        down!()
    }
    async fn register_observer(&self, _: Arc<dyn acl_store::WriteObserver>) {}
}

/// With the store down, registration degrades to an empty ability map and
/// every check denies. Nothing panics and no error escapes to the caller.
#[tokio::test]
async fn test_registration_degrades_when_store_is_down() {
    let cache = Arc::new(MemoryCache::new());
    let (gate, registrar) = bootstrap(Arc::new(DownStore), cache.clone(), AclConfig::default()).await;

    assert!(gate.abilities().await.is_empty());
    assert!(!cache.contains("permissions.policies").await);

    let subject = Subject::new(Uuid::now_v7()).with_direct_permission("view-article");
    assert!(gate.denies(Some(&subject), "view-article").await);
    assert!(!gate.can_at_least(None, &["view-article"]).await);

    // Re-registering against the same outage stays quiet too.
    registrar.invalidate().await;
    assert!(gate.abilities().await.is_empty());
}
