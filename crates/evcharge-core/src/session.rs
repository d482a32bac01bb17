//! Session persistence and change notification.
//!
//! Stores the authenticated session in `<home>/session.json` with restricted
//! permissions (0600). Tokens are never logged or displayed in full. Every
//! write or clear is broadcast to subscribers so other live contexts can
//! re-read the store.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::config::paths;

/// Broadcast channel capacity for session change events.
const EVENT_CAPACITY: usize = 16;

/// The user record returned by the API and owned by the session.
///
/// Replaced wholesale on login, never partially mutated. Unknown or absent
/// optional fields are tolerated so older server payloads still parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl UserRecord {
    /// Returns the effective role, defaulting to "user" when absent.
    ///
    /// Admin standing comes only from `is_admin`, never from this value.
    pub fn effective_role(&self) -> &str {
        self.role.as_deref().unwrap_or("user")
    }
}

/// The client-side session: a token and user record, both or neither.
///
/// An authenticated session holds both fields; the empty session holds
/// neither. A half-present pair can only come from a tampered session file
/// and reads as unauthenticated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<UserRecord>,
}

impl Session {
    /// Creates the empty (logged-out) session.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates an authenticated session from a token and user record.
    pub fn authenticated(token: impl Into<String>, user: UserRecord) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
        }
    }

    /// Returns true iff both token and user are present.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// Returns the opaque token, if present.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns the user record, if present.
    pub fn user(&self) -> Option<&UserRecord> {
        self.user.as_ref()
    }
}

/// Change events emitted by the session store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A session was written.
    Updated,
    /// The session was cleared.
    Cleared,
}

/// Receives session change notifications from a [`SessionStore`].
///
/// Subscribers re-read the store on every notification; the event itself
/// carries no session data, so a lagged receiver just re-reads as usual.
pub struct SessionWatcher {
    rx: broadcast::Receiver<SessionEvent>,
}

impl SessionWatcher {
    /// Waits for the next change event.
    ///
    /// Returns `None` when the store has been dropped. A lagged receiver is
    /// reported as an update since the correct response is a re-read either
    /// way.
    pub async fn changed(&mut self) -> Option<SessionEvent> {
        match self.rx.recv().await {
            Ok(event) => Some(event),
            Err(broadcast::error::RecvError::Lagged(_)) => Some(SessionEvent::Updated),
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }
}

/// File-backed session store with change notification.
///
/// The single source of truth for authentication state. Reads never fail:
/// a missing or unreadable file is the empty session, and a corrupt stored
/// user record reads as absent (fail open to logged-out).
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    /// Creates a store over an explicit session file path.
    pub fn new(path: impl Into<PathBuf>) -> Arc<Self> {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            path: path.into(),
            tx,
        })
    }

    /// Creates a store over the default session path under the evcharge home.
    pub fn open_default() -> Arc<Self> {
        Self::new(paths::session_path())
    }

    /// Returns the session file path.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Subscribes to change notifications.
    pub fn subscribe(&self) -> SessionWatcher {
        SessionWatcher {
            rx: self.tx.subscribe(),
        }
    }

    /// Reads the current session from disk.
    ///
    /// Missing file -> empty session. Unparseable file -> empty session.
    /// A parseable file with a corrupt user record keeps the token but drops
    /// the user, which still reads as unauthenticated.
    pub fn read(&self) -> Session {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Session::empty(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "failed to read session file");
                return Session::empty();
            }
        };

        let value: serde_json::Value = match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "session file is not valid JSON");
                return Session::empty();
            }
        };

        let token = value
            .get("token")
            .and_then(serde_json::Value::as_str)
            .map(std::string::ToString::to_string);
        let user = match value.get("user") {
            Some(raw) if !raw.is_null() => {
                match serde_json::from_value::<UserRecord>(raw.clone()) {
                    Ok(user) => Some(user),
                    Err(err) => {
                        tracing::warn!(%err, "stored user record is corrupt; treating as logged out");
                        None
                    }
                }
            }
            _ => None,
        };

        Session { token, user }
    }

    /// Writes a session to disk with restricted permissions (0600).
    ///
    /// Refuses to persist a partial session: callers pass either an
    /// authenticated session or the empty one. The write is atomic (temp
    /// file + rename) and subscribers are notified afterwards.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn write(&self, session: &Session) -> Result<()> {
        if session.token.is_some() != session.user.is_some() {
            anyhow::bail!("refusing to persist a session with only one of token/user");
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;
        let tmp_path = self.path.with_extension("json.tmp");

        // Write with restricted permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&tmp_path)
                .with_context(|| format!("Failed to open {} for writing", tmp_path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", tmp_path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&tmp_path, &contents)
                .with_context(|| format!("Failed to write to {}", tmp_path.display()))?;
        }

        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        let _ = self.tx.send(SessionEvent::Updated);
        Ok(())
    }

    /// Clears the session unconditionally; idempotent.
    ///
    /// Returns whether a session file existed. Subscribers are notified only
    /// when something was actually removed.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                let _ = self.tx.send(SessionEvent::Cleared);
                Ok(true)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err).with_context(|| {
                format!("Failed to remove session file {}", self.path.display())
            }),
        }
    }
}

/// Returns a masked version of a token for display (first 12 chars + ...).
pub fn mask_token(token: &str) -> String {
    if token.len() <= 16 {
        return "***".to_string();
    }
    format!("{}...", &token[..12])
}

#[cfg(test)]
pub(crate) fn test_user(name: &str, is_admin: bool, role: Option<&str>) -> UserRecord {
    UserRecord {
        id: 1,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: Some("9876543210".to_string()),
        is_admin,
        role: role.map(std::string::ToString::to_string),
        is_active: Some(true),
        is_verified: Some(true),
        created_at: None,
    }
}
