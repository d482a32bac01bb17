//! HTTP client for the charging-network API.
//!
//! One `ApiClient` instance serves every endpoint group. It attaches the
//! stored bearer token to each request when a session exists and clears the
//! session store on any 401 response before surfacing the error.

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod bookings;
pub mod companies;
pub mod error;
pub mod payments;
pub mod stations;

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::session::SessionStore;

pub use error::{ApiError, ApiErrorKind, ApiResult};

/// User agent sent with all API requests.
pub(crate) const USER_AGENT: &str = concat!("evcharge/", env!("CARGO_PKG_VERSION"));

/// Client for the charging-network API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<SessionStore>,
}

impl ApiClient {
    /// Creates a client against the given base URL.
    ///
    /// The base URL must not end with a trailing slash; endpoint paths
    /// supply their own leading slash.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn new(base_url: impl Into<String>, store: Arc<SessionStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            store,
        })
    }

    /// Returns the base URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the session store backing this client.
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let req = self.http.request(method, url);
        match self.store.read().token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        fallback: &str,
    ) -> ApiResult<T> {
        let req = self.request(reqwest::Method::GET, path);
        self.execute(req, fallback).await
    }

    pub(crate) async fn get_json_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
        fallback: &str,
    ) -> ApiResult<T> {
        let req = self.request(reqwest::Method::GET, path).query(query);
        self.execute(req, fallback).await
    }

    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> ApiResult<T> {
        let req = self.request(reqwest::Method::POST, path).json(body);
        self.execute(req, fallback).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
        fallback: &str,
    ) -> ApiResult<T> {
        let req = self.request(reqwest::Method::POST, path);
        self.execute(req, fallback).await
    }

    pub(crate) async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> ApiResult<T> {
        let req = self.request(reqwest::Method::PUT, path).json(body);
        self.execute(req, fallback).await
    }

    pub(crate) async fn delete(&self, path: &str, fallback: &str) -> ApiResult<()> {
        let req = self.request(reqwest::Method::DELETE, path);
        let resp = req.send().await.map_err(|e| ApiError::transport(&e))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(self.fail(resp, fallback).await)
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
        fallback: &str,
    ) -> ApiResult<T> {
        let resp = req.send().await.map_err(|e| ApiError::transport(&e))?;
        if resp.status().is_success() {
            resp.json().await.map_err(|e| ApiError::decode(&e))
        } else {
            Err(self.fail(resp, fallback).await)
        }
    }

    /// Converts an error response, clearing the stored session on 401.
    async fn fail(&self, resp: reqwest::Response, fallback: &str) -> ApiError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let err = ApiError::from_response(status, &body, fallback);
        if err.is_unauthorized() {
            if let Err(clear_err) = self.store.clear() {
                tracing::warn!("failed to clear session after 401: {clear_err:#}");
            }
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Session, SessionStore, test_user};
    use serde::Deserialize;
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Pong {
        ok: bool,
    }

    fn store_in(dir: &TempDir) -> std::sync::Arc<SessionStore> {
        SessionStore::new(dir.path().join("session.json"))
    }

    /// Test: requests carry the stored bearer token when a session exists.
    #[tokio::test]
    async fn test_bearer_attached_when_session_present() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store
            .write(&Session::authenticated(
                "tok-123",
                test_user("Asha", false, None),
            ))
            .unwrap();

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), store).unwrap();
        let pong: Pong = client.get_json("/ping", "Something went wrong").await.unwrap();
        assert!(pong.ok);
    }

    /// Test: no authorization header is sent without a session.
    #[tokio::test]
    async fn test_no_bearer_without_session() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), store).unwrap();
        let _: Pong = client.get_json("/ping", "Something went wrong").await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(
            requests[0]
                .headers
                .get("authorization")
                .is_none()
        );
    }

    /// Test: a 401 response clears the stored session before surfacing.
    #[tokio::test]
    async fn test_unauthorized_clears_session() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store
            .write(&Session::authenticated(
                "stale",
                test_user("Asha", false, None),
            ))
            .unwrap();

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/stats"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"detail": "Could not validate credentials"})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), store.clone()).unwrap();
        let err = client
            .get_json::<Pong>("/admin/stats", "Something went wrong")
            .await
            .unwrap_err();

        assert_eq!(err.kind, ApiErrorKind::Unauthorized);
        assert_eq!(err.message, "Could not validate credentials");
        assert!(!store.read().is_authenticated());
        assert!(!dir.path().join("session.json").exists());
    }

    /// Test: non-401 errors leave the session intact.
    #[tokio::test]
    async fn test_server_error_keeps_session() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store
            .write(&Session::authenticated(
                "tok",
                test_user("Asha", false, None),
            ))
            .unwrap();

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), store.clone()).unwrap();
        let err = client
            .get_json::<Pong>("/ping", "Something went wrong")
            .await
            .unwrap_err();

        assert_eq!(err.kind, ApiErrorKind::Http(500));
        assert!(store.read().is_authenticated());
    }

    /// Test: connection failures map to the generic unavailable message.
    #[tokio::test]
    async fn test_transport_error_is_service_unavailable() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        // A server that is immediately dropped leaves a closed port behind.
        // Use the builder: pooled `MockServer::start` keeps the port listening
        // after drop, so only a non-pooled server actually frees it.
        let server = MockServer::builder().start().await;
        let uri = server.uri();
        drop(server);

        let client = ApiClient::new(uri, store).unwrap();
        let err = client
            .get_json::<Pong>("/ping", "Something went wrong")
            .await
            .unwrap_err();

        assert_eq!(err.kind, ApiErrorKind::Transport);
        assert_eq!(err.message, "Service unavailable");
    }

    /// Test: delete treats an empty 204 body as success.
    #[tokio::test]
    async fn test_delete_accepts_no_content() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/companies/3"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), store).unwrap();
        client
            .delete("/companies/3", "Failed to delete company")
            .await
            .unwrap();
    }
}
