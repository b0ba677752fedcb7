/// Local session cache
///
/// Holds the token and user profile from the last successful login so that
/// later commands can authenticate without asking for credentials again.
/// Storage is pluggable through [`SessionStore`]: a JSON file for the CLI,
/// memory for tests and embedding.
///
/// A stored session that cannot be parsed is treated as a logout: it is
/// cleared and the cache starts empty.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tasktrail_shared::models::user::Role;
use tasktrail_shared::service::identity::{LoginResponse, UserProfile};
use tracing::{debug, warn};

use crate::error::SessionError;

/// Token plus the user it was issued to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user: UserProfile,
}

impl From<LoginResponse> for Session {
    fn from(response: LoginResponse) -> Self {
        Self {
            access_token: response.access_token,
            user: response.user,
        }
    }
}

/// Persistence for a single session
pub trait SessionStore: Send + Sync {
    /// Reads the stored session
    ///
    /// `Ok(None)` when nothing is stored, `Err(SessionError::Corrupt)` when
    /// something is stored but unreadable.
    fn load(&self) -> Result<Option<Session>, SessionError>;

    fn save(&self, session: &Session) -> Result<(), SessionError>;

    /// Removes the stored session; succeeds if nothing was stored
    fn clear(&self) -> Result<(), SessionError>;
}

/// Session stored as a JSON file
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.config/tasktrail/session.json`, or `session.json` in the
    /// working directory when `HOME` is unset
    pub fn default_path() -> PathBuf {
        match std::env::var("HOME") {
            Ok(home) => PathBuf::from(home)
                .join(".config")
                .join("tasktrail")
                .join("session.json"),
            Err(_) => PathBuf::from("session.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, content)?;
        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Session held in memory as serialized JSON
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    raw: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with arbitrary content, parsed on `load`
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slot().is_none()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // A poisoned lock still holds a usable value
        self.raw.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        match self.slot().as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        *self.slot() = Some(serde_json::to_string(session)?);
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot() = None;
        Ok(())
    }
}

/// In-process view of the stored session
pub struct SessionCache<S: SessionStore> {
    store: S,
    current: Option<Session>,
}

impl<S: SessionStore> SessionCache<S> {
    /// Loads whatever the store holds
    ///
    /// Corrupt content is cleared. I/O failures are returned.
    pub fn restore(store: S) -> Result<Self, SessionError> {
        let current = match store.load() {
            Ok(session) => session,
            Err(SessionError::Corrupt(e)) => {
                warn!(error = %e, "Discarding unreadable stored session");
                store.clear()?;
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Self { store, current })
    }

    /// Replaces the current session and persists it
    pub fn set(&mut self, session: Session) -> Result<(), SessionError> {
        self.store.save(&session)?;
        self.current = Some(session);
        Ok(())
    }

    /// Forgets the current session, in memory and in the store
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.current = None;
        self.store.clear()
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.current.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.access_token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Whether the cached user's role is at least `role`
    ///
    /// Only useful for hiding actions the server would refuse anyway.
    pub fn has_role(&self, role: Role) -> bool {
        self.current_user()
            .map(|user| user.role.at_least(role))
            .unwrap_or(false)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
