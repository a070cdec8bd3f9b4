//! Session store.
//!
//! Holds the bearer token and user identity, persisted to
//! `~/.farmgate/session.json` so a login survives across runs. The store
//! is constructed once and shared (via `Arc`) with the API client and the
//! route guard — there is no global mutable session state.
//!
//! `current()` is synchronous and never touches the network; the route
//! guard calls it on every navigation.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::role::Role;

/// Immutable snapshot of an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer credential sent with every authenticated request.
    pub token: String,
    /// Server-assigned user id.
    pub user_id: u64,
    /// Account role. Unknown roles never make it into a `Session`.
    pub role: Role,
}

/// Persistent session store.
///
/// All mutations go through `establish` and `clear`; readers get cloned
/// snapshots. A malformed or missing file on disk is treated as "not
/// logged in", never as a fatal error.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    inner: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Default persisted location: `~/.farmgate/session.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".farmgate").join("session.json"))
    }

    /// Open a store backed by `path`, rehydrating any persisted session.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let session = read_session(&path);
        if session.is_some() {
            debug!(path = %path.display(), "rehydrated session");
        }
        Self {
            path,
            inner: RwLock::new(session),
        }
    }

    /// Synchronous snapshot of the current session, if any.
    pub fn current(&self) -> Option<Session> {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Current role, if logged in.
    pub fn role(&self) -> Option<Role> {
        self.current().map(|s| s.role)
    }

    /// Store credentials and persist them. Subsequent API requests carry
    /// `Authorization: Bearer <token>`.
    pub fn establish(&self, session: Session) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&session)?;
        std::fs::write(&self.path, json)
            .map_err(|e| Error::Session(format!("failed to persist session: {e}")))?;

        match self.inner.write() {
            Ok(mut guard) => *guard = Some(session),
            Err(poisoned) => *poisoned.into_inner() = Some(session),
        }
        Ok(())
    }

    /// Drop credentials from memory and disk. Called on explicit logout
    /// and whenever the server answers 401.
    pub fn clear(&self) {
        match self.inner.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                warn!(path = %self.path.display(), error = %e, "failed to remove session file");
            }
        }
    }
}

/// Read a persisted session. Anything short of valid JSON with a known
/// role is "no session".
fn read_session(path: &Path) -> Option<Session> {
    let raw = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(session) => Some(session),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring malformed session file");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::open(dir.path().join("session.json"))
    }

    fn customer_session() -> Session {
        Session {
            token: "tok-123".into(),
            user_id: 7,
            role: Role::Customer,
        }
    }

    #[test]
    fn fresh_store_has_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.current().is_none());
        assert!(store.role().is_none());
    }

    #[test]
    fn establish_then_current_returns_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.establish(customer_session()).unwrap();
        let snap = store.current().unwrap();
        assert_eq!(snap.token, "tok-123");
        assert_eq!(snap.role, Role::Customer);
    }

    #[test]
    fn session_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        SessionStore::open(&path).establish(customer_session()).unwrap();

        let reopened = SessionStore::open(&path);
        assert_eq!(reopened.current().unwrap().user_id, 7);
    }

    #[test]
    fn clear_removes_memory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = SessionStore::open(&path);
        store.establish(customer_session()).unwrap();
        store.clear();
        assert!(store.current().is_none());
        assert!(!path.exists());
        // And a reopen sees nothing either.
        assert!(SessionStore::open(&path).current().is_none());
    }

    #[test]
    fn malformed_file_is_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(SessionStore::open(&path).current().is_none());
    }

    #[test]
    fn unknown_role_on_disk_is_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(
            &path,
            r#"{"token":"t","user_id":1,"role":"merchant"}"#,
        )
        .unwrap();
        assert!(SessionStore::open(&path).current().is_none());
    }

    #[test]
    fn establish_overwrites_previous_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.establish(customer_session()).unwrap();
        store
            .establish(Session {
                token: "tok-456".into(),
                user_id: 9,
                role: Role::Admin,
            })
            .unwrap();
        let snap = store.current().unwrap();
        assert_eq!(snap.token, "tok-456");
        assert_eq!(snap.role, Role::Admin);
    }
}
