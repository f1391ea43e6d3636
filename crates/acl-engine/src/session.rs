//! Principal session
//!
//! Explicit replacement for an ambient auth accessor: the embedding
//! application authenticates a principal id, the session loads and holds
//! the subject snapshot, and every check receives it as an argument. The
//! registrar refreshes an attached session after each invalidation so
//! checks later in the same request see new grants.

use std::sync::Arc;
use tokio::sync::RwLock;

use acl_model::Subject;
use acl_store::{AclStore, StoreResult};

/// Holds the currently authenticated subject snapshot, if any.
pub struct Session {
    store: Arc<dyn AclStore>,
    subject: RwLock<Option<Subject>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish()
    }
}

impl Session {
    /// Create an anonymous session.
    pub fn new(store: Arc<dyn AclStore>) -> Self {
        Self {
            store,
            subject: RwLock::new(None),
        }
    }

    /// Authenticate a principal: load and hold its snapshot.
    pub async fn login(&self, subject_id: uuid::Uuid) -> StoreResult<Subject> {
        let subject = self.store.load_subject(subject_id).await?;
        *self.subject.write().await = Some(subject.clone());
        Ok(subject)
    }

    /// Drop the authenticated subject.
    pub async fn logout(&self) {
        *self.subject.write().await = None;
    }

    /// Whether a principal is authenticated.
    pub async fn check(&self) -> bool {
        self.subject.read().await.is_some()
    }

    /// The current subject snapshot, if authenticated.
    pub async fn subject(&self) -> Option<Subject> {
        self.subject.read().await.clone()
    }

    /// Reload the authenticated subject's associations from the store.
    ///
    /// No-op for anonymous sessions.
    pub async fn refresh(&self) -> StoreResult<()> {
        let id = match self.subject.read().await.as_ref() {
            Some(subject) => subject.id,
            None => return Ok(()),
        };
        let subject = self.store.load_subject(id).await?;
        *self.subject.write().await = Some(subject);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acl_model::{HasRoles, Role};
    use acl_store::MemoryStore;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_login_logout() {
        let store = Arc::new(MemoryStore::new());
        let session = Session::new(store.clone());
        assert!(!session.check().await);

        let id = Uuid::now_v7();
        session.login(id).await.unwrap();
        assert!(session.check().await);
        assert_eq!(session.subject().await.map(|s| s.id), Some(id));

        session.logout().await;
        assert!(!session.check().await);
    }

    #[tokio::test]
    async fn test_refresh_sees_new_grants() {
        let store = Arc::new(MemoryStore::new());
        let session = Session::new(store.clone());

        let id = Uuid::now_v7();
        session.login(id).await.unwrap();
        let before = session.subject().await.expect("authenticated");
        assert!(!before.has_role("admin"));

        let admin = store
            .create_role(Role::new("Administrator", "admin"))
            .await
            .unwrap();
        store.attach_role(id, admin.id).await.unwrap();

        session.refresh().await.unwrap();
        let after = session.subject().await.expect("authenticated");
        assert!(after.has_role("admin"));
    }

    #[tokio::test]
    async fn test_refresh_is_noop_when_anonymous() {
        let store = Arc::new(MemoryStore::new());
        let session = Session::new(store);
        session.refresh().await.unwrap();
        assert!(!session.check().await);
    }
}
