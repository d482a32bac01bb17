//! Login, logout, and the session-backed view of the current user.
//!
//! The manager keeps an in-memory snapshot of the session. Changes made
//! through this manager update the snapshot immediately; changes made by
//! another context (another process, another manager) become visible after
//! `refresh`, typically driven by the store's change notifications.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;

use crate::api::{ApiClient, ApiError};
use crate::guard::{self, GuardOutcome};
use crate::session::{Session, SessionStore, SessionWatcher, UserRecord};

/// Why a login attempt failed.
#[derive(Debug)]
pub enum AuthError {
    /// The API rejected the credentials or was unreachable.
    Api(ApiError),
    /// The grant could not be persisted.
    Storage(anyhow::Error),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Api(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "Failed to save session: {err}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

/// Session-aware authentication facade.
pub struct AuthManager {
    client: ApiClient,
    snapshot: RwLock<Session>,
}

impl AuthManager {
    /// Creates a manager with a snapshot read from the backing store.
    pub fn new(client: ApiClient) -> Self {
        let snapshot = RwLock::new(client.store().read());
        Self { client, snapshot }
    }

    /// The API client this manager drives.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn store(&self) -> &Arc<SessionStore> {
        self.client.store()
    }

    /// Exchanges credentials for a session, persisting token and user
    /// together before the snapshot updates.
    ///
    /// On failure the prior session is not overwritten, though a 401 from
    /// the server will have cleared the stored session at the client layer.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserRecord, AuthError> {
        match self.client.login(email, password).await {
            Ok(grant) => {
                let session = Session::authenticated(grant.access_token, grant.user.clone());
                self.store().write(&session).map_err(AuthError::Storage)?;
                *self.snapshot.write().await = session;
                Ok(grant.user)
            }
            Err(err) => {
                *self.snapshot.write().await = self.store().read();
                Err(AuthError::Api(err))
            }
        }
    }

    /// Clears the stored session. Returns true when one existed.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn logout(&self) -> Result<bool> {
        let removed = self.store().clear()?;
        *self.snapshot.write().await = Session::empty();
        Ok(removed)
    }

    /// The signed-in user, if any.
    pub async fn current_user(&self) -> Option<UserRecord> {
        self.snapshot.read().await.user().cloned()
    }

    /// True when the snapshot holds both token and user.
    pub async fn is_authenticated(&self) -> bool {
        self.snapshot.read().await.is_authenticated()
    }

    /// True when the signed-in user carries the admin flag.
    pub async fn is_admin(&self) -> bool {
        self.snapshot.read().await.user().is_some_and(|u| u.is_admin)
    }

    /// The signed-in user's role, defaulting to "user".
    pub async fn role(&self) -> String {
        self.snapshot
            .read()
            .await
            .user()
            .map_or_else(|| "user".to_string(), |u| u.effective_role().to_string())
    }

    /// A copy of the current snapshot.
    pub async fn session(&self) -> Session {
        self.snapshot.read().await.clone()
    }

    /// Evaluates a route guard against the current snapshot.
    pub async fn guard(&self, required_role: Option<&str>) -> GuardOutcome {
        guard::evaluate(required_role, &*self.snapshot.read().await)
    }

    /// Re-reads the backing store into the snapshot.
    pub async fn refresh(&self) {
        *self.snapshot.write().await = self.store().read();
    }

    /// Subscribes to session change notifications from the store.
    pub fn subscribe(&self) -> SessionWatcher {
        self.store().subscribe()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{AuthError, AuthManager};
    use crate::api::ApiClient;
    use crate::guard::GuardOutcome;
    use crate::session::{Session, SessionEvent, SessionStore, test_user};

    fn grant_body(is_admin: bool) -> serde_json::Value {
        serde_json::json!({
            "access_token": "tok-1",
            "token_type": "bearer",
            "user": {
                "id": 4,
                "email": "asha@example.com",
                "name": "Asha",
                "phone": "0712345678",
                "is_admin": is_admin,
                "is_verified": true,
                "role": if is_admin { "admin" } else { "user" },
                "created_at": "2025-04-01T10:00:00"
            }
        })
    }

    fn manager_for(server: &MockServer, store: Arc<SessionStore>) -> AuthManager {
        AuthManager::new(ApiClient::new(server.uri(), store).unwrap())
    }

    /// Test: login persists token and user together, then the snapshot
    /// reflects the signed-in user.
    #[tokio::test]
    async fn test_login_persists_and_updates_snapshot() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(grant_body(false)))
            .mount(&server)
            .await;

        let manager = manager_for(&server, store.clone());
        assert!(!manager.is_authenticated().await);

        let user = manager.login("asha@example.com", "hunter22").await.unwrap();
        assert_eq!(user.name, "Asha");
        assert!(manager.is_authenticated().await);
        assert_eq!(manager.role().await, "user");

        let persisted = store.read();
        assert_eq!(persisted.token(), Some("tok-1"));
        assert!(persisted.user().is_some());
    }

    /// Test: a failed login leaves the prior session in place.
    #[tokio::test]
    async fn test_failed_login_keeps_prior_session() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store
            .write(&Session::authenticated("old-tok", test_user("Asha", false, None)))
            .unwrap();

        // 400, not 401: the server asks for registration to be completed.
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(400).set_body_json(
                serde_json::json!({"detail": "Please verify your email first"}),
            ))
            .mount(&server)
            .await;

        let manager = manager_for(&server, store.clone());
        let err = manager.login("asha@example.com", "hunter22").await.unwrap_err();
        assert!(matches!(err, AuthError::Api(ref api) if api.message == "Please verify your email first"));
        assert!(manager.is_authenticated().await);
        assert_eq!(store.read().token(), Some("old-tok"));
    }

    /// Test: logout clears the store and flips the snapshot to logged out.
    #[tokio::test]
    async fn test_logout_clears_everything() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store
            .write(&Session::authenticated("tok", test_user("Asha", true, Some("admin"))))
            .unwrap();

        let manager = manager_for(&server, store.clone());
        assert!(manager.is_admin().await);

        assert!(manager.logout().await.unwrap());
        assert!(!manager.is_authenticated().await);
        assert!(manager.current_user().await.is_none());
        assert!(!dir.path().join("session.json").exists());

        // Second logout is a no-op.
        assert!(!manager.logout().await.unwrap());
    }

    /// Test: a guarded admin view redirects to login once logged out.
    #[tokio::test]
    async fn test_guard_after_logout_redirects_login() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store
            .write(&Session::authenticated("tok", test_user("Root", true, Some("admin"))))
            .unwrap();

        let manager = manager_for(&server, store);
        assert_eq!(manager.guard(Some("admin")).await, GuardOutcome::Allow);

        manager.logout().await.unwrap();
        assert_eq!(manager.guard(Some("admin")).await, GuardOutcome::RedirectLogin);
    }

    /// Test: a change made by one manager reaches another after the
    /// watcher fires and the second manager refreshes.
    #[tokio::test]
    async fn test_cross_context_refresh() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(grant_body(false)))
            .mount(&server)
            .await;

        let first = manager_for(&server, store.clone());
        let second = manager_for(&server, store.clone());
        let mut watcher = second.subscribe();

        first.login("asha@example.com", "hunter22").await.unwrap();

        // Stale until the notification is consumed and the store re-read.
        assert!(!second.is_authenticated().await);
        assert_eq!(watcher.changed().await, Some(SessionEvent::Updated));
        second.refresh().await;
        assert!(second.is_authenticated().await);
        assert_eq!(second.current_user().await.map(|u| u.name), Some("Asha".to_string()));
    }
}
