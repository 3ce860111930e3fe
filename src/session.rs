//! Authentication state: the current bearer token and signed-in user.
//!
//! ARCHITECTURE
//! ============
//! [`AuthState`] is an explicit object owned by the caller and passed to
//! whatever needs it; there is no ambient global. Persistence sits behind
//! [`SessionStore`], a single key-value slot holding `{ token, user }`.
//!
//! `restore` trusts a persisted token without asking the backend; a stale
//! token shows up as a 401 on the next authenticated call.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{AuthSession, Credentials, User};

/// Persisted storage for one session record.
pub trait SessionStore {
    /// Read the stored session, `None` when nothing is stored.
    ///
    /// # Errors
    ///
    /// [`ApiError::Storage`] when the slot exists but cannot be read or parsed.
    fn load(&self) -> Result<Option<AuthSession>, ApiError>;

    /// Replace the stored session.
    ///
    /// # Errors
    ///
    /// [`ApiError::Storage`] when the slot cannot be written.
    fn save(&self, session: &AuthSession) -> Result<(), ApiError>;

    /// Remove the stored session; clearing an empty slot succeeds.
    ///
    /// # Errors
    ///
    /// [`ApiError::Storage`] when the slot cannot be removed.
    fn clear(&self) -> Result<(), ApiError>;
}

// =============================================================================
// FILE STORE
// =============================================================================

/// JSON file holding the session, created with owner-only permissions on unix.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn storage_error(path: &Path, action: &str, error: impl std::fmt::Display) -> ApiError {
    ApiError::Storage(format!("{action} {}: {error}", path.display()))
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<AuthSession>, ApiError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error(&self.path, "read", e)),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| storage_error(&self.path, "parse", e))
    }

    fn save(&self, session: &AuthSession) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| storage_error(parent, "create", e))?;
        }
        let text = serde_json::to_string_pretty(session).map_err(|e| storage_error(&self.path, "encode", e))?;
        std::fs::write(&self.path, text).map_err(|e| storage_error(&self.path, "write", e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| storage_error(&self.path, "chmod", e))?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(&self.path, "remove", e)),
        }
    }
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// In-process slot holding the serialized session, like browser storage.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<String>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-filled with `session`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Storage`] if the session cannot be serialized.
    pub fn with_session(session: &AuthSession) -> Result<Self, ApiError> {
        let store = Self::new();
        store.save(session)?;
        Ok(store)
    }

    /// Raw stored text, `None` when empty.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    fn with_slot<R>(&self, f: impl FnOnce(&mut Option<String>) -> R) -> Result<R, ApiError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| ApiError::Storage("session slot poisoned".to_owned()))?;
        Ok(f(&mut slot))
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<AuthSession>, ApiError> {
        let Some(text) = self.with_slot(|slot| slot.clone())? else {
            return Ok(None);
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| ApiError::Storage(format!("parse session: {e}")))
    }

    fn save(&self, session: &AuthSession) -> Result<(), ApiError> {
        let text = serde_json::to_string(session).map_err(|e| ApiError::Storage(format!("encode session: {e}")))?;
        self.with_slot(|slot| *slot = Some(text))
    }

    fn clear(&self) -> Result<(), ApiError> {
        self.with_slot(|slot| *slot = None)
    }
}

// =============================================================================
// AUTH STATE
// =============================================================================

/// Current authentication plus the store it is persisted in.
#[derive(Debug)]
pub struct AuthState<S> {
    store: S,
    session: Option<AuthSession>,
}

impl<S: SessionStore> AuthState<S> {
    /// Logged-out state backed by `store`; call [`AuthState::restore`] to load.
    pub fn new(store: S) -> Self {
        Self { store, session: None }
    }

    /// Build and immediately restore from `store`.
    pub fn restored(store: S) -> Self {
        let mut state = Self::new(store);
        state.restore();
        state
    }

    /// Load the persisted session into memory. Returns whether one was found.
    ///
    /// An unreadable or corrupt slot counts as logged out.
    pub fn restore(&mut self) -> bool {
        self.session = match self.store.load() {
            Ok(session) => session.filter(|s| !s.token.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable session");
                None
            }
        };
        if let Some(session) = &self.session {
            tracing::debug!(email = %session.user.email, "session restored");
        }
        self.session.is_some()
    }

    /// Exchange credentials for a token, then persist and adopt the session.
    ///
    /// On failure the current state is left as it was.
    ///
    /// # Errors
    ///
    /// The backend's login error unchanged, or [`ApiError::Storage`] if the
    /// session cannot be persisted.
    pub async fn login(&mut self, client: &ApiClient, email: &str, password: &str) -> Result<&AuthSession, ApiError> {
        let credentials = Credentials { email: email.to_owned(), password: password.to_owned() };
        let session = client.with_token(None).login(&credentials).await?;
        self.store.save(&session)?;
        tracing::info!(email = %session.user.email, admin = session.user.is_admin, "logged in");
        Ok(self.session.insert(session))
    }

    /// Drop the session from memory and storage. Never fails.
    pub fn logout(&mut self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to clear persisted session");
        }
        if let Some(session) = self.session.take() {
            tracing::info!(email = %session.user.email, "logged out");
        }
    }

    /// `client` bound to the current token, or anonymous when logged out.
    #[must_use]
    pub fn client(&self, client: &ApiClient) -> ApiClient {
        client.with_token(self.token())
    }

    #[must_use]
    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|u| u.is_admin)
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
