//! Authentication session.
//!
//! The session is an explicit service handed to the client: logging in and
//! out are state transitions on it, and the token is persisted through a
//! [`TokenStore`] so it survives between runs.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use tracing::{info, warn};

use crate::config::AgendaConfig;
use crate::error::{AgendaError, AgendaResult};

/// Where the bearer token is kept between runs.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> AgendaResult<Option<String>>;
    fn save(&self, token: &str) -> AgendaResult<()>;
    fn clear(&self) -> AgendaResult<()>;
}

/// Token kept in a file next to the config (`~/.config/agenda/session`).
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileTokenStore { path: path.into() }
    }

    pub fn default_location() -> AgendaResult<Self> {
        Ok(FileTokenStore::new(AgendaConfig::config_dir()?.join("session")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> AgendaResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let token = std::fs::read_to_string(&self.path)
            .map_err(|e| AgendaError::Session(format!("Could not read session file: {e}")))?;
        let token = token.trim();
        Ok((!token.is_empty()).then(|| token.to_string()))
    }

    fn save(&self, token: &str) -> AgendaResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AgendaError::Session(format!("Could not create session directory: {e}"))
            })?;
        }
        std::fs::write(&self.path, token)
            .map_err(|e| AgendaError::Session(format!("Could not write session file: {e}")))?;

        // Owner-only (0600), the file holds a bearer token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600)).map_err(
                |e| AgendaError::Session(format!("Could not set session file permissions: {e}")),
            )?;
        }

        Ok(())
    }

    fn clear(&self) -> AgendaResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AgendaError::Session(format!(
                "Could not remove session file: {e}"
            ))),
        }
    }
}

/// Token kept only in memory.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> AgendaResult<Option<String>> {
        Ok(self.guard().clone())
    }

    fn save(&self, token: &str) -> AgendaResult<()> {
        *self.guard() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> AgendaResult<()> {
        *self.guard() = None;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated { token: String },
}

pub struct Session {
    state: RwLock<SessionState>,
    store: Box<dyn TokenStore>,
}

impl Session {
    /// Start a session from whatever token the store holds.
    pub fn restore(store: Box<dyn TokenStore>) -> AgendaResult<Self> {
        let state = match store.load()? {
            Some(token) => SessionState::Authenticated { token },
            None => SessionState::Anonymous,
        };
        Ok(Session {
            state: RwLock::new(state),
            store,
        })
    }

    /// An anonymous, memory-only session.
    pub fn in_memory() -> Self {
        Session {
            state: RwLock::new(SessionState::Anonymous),
            store: Box::new(MemoryTokenStore::new()),
        }
    }

    pub fn state(&self) -> SessionState {
        match self.state.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn token(&self) -> Option<String> {
        match self.state() {
            SessionState::Authenticated { token } => Some(token),
            SessionState::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn login(&self, token: impl Into<String>) -> AgendaResult<()> {
        let token = token.into();
        self.store.save(&token)?;
        self.set_state(SessionState::Authenticated { token });
        info!("Session started");
        Ok(())
    }

    /// Drop the token. The in-memory state is cleared even if the store
    /// cannot be updated.
    pub fn logout(&self) {
        self.set_state(SessionState::Anonymous);
        if let Err(e) = self.store.clear() {
            warn!("Could not clear stored session: {}", e);
        }
        info!("Session ended");
    }

    fn set_state(&self, state: SessionState) {
        match self.state.write() {
            Ok(mut guard) => *guard = state,
            Err(poisoned) => *poisoned.into_inner() = state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_and_logout_transition_state() {
        let session = Session::in_memory();
        assert_eq!(session.state(), SessionState::Anonymous);

        session.login("abc").unwrap();
        assert_eq!(session.token().as_deref(), Some("abc"));
        assert!(session.is_authenticated());

        session.logout();
        assert_eq!(session.state(), SessionState::Anonymous);
        assert!(session.token().is_none());
    }

    #[test]
    fn file_store_persists_across_restore() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session");

        let session = Session::restore(Box::new(FileTokenStore::new(&path))).unwrap();
        assert!(!session.is_authenticated());
        session.login("token-123").unwrap();

        let restored = Session::restore(Box::new(FileTokenStore::new(&path))).unwrap();
        assert_eq!(restored.token().as_deref(), Some("token-123"));

        restored.logout();
        assert!(!path.exists());
        let after = Session::restore(Box::new(FileTokenStore::new(&path))).unwrap();
        assert!(!after.is_authenticated());
    }

    #[test]
    fn empty_session_file_is_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session");
        std::fs::write(&path, "  \n").unwrap();

        let store = FileTokenStore::new(&path);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn clearing_missing_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("missing"));
        assert!(store.clear().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session");
        FileTokenStore::new(&path).save("secret-bearer").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn poisoned_lock_keeps_the_last_state() {
        let session = std::sync::Arc::new(Session::in_memory());
        session.login("kept").unwrap();

        let poisoner = std::sync::Arc::clone(&session);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.state.write().unwrap();
            panic!("poison the session lock");
        })
        .join();

        assert!(session.state.is_poisoned());
        assert_eq!(session.token().as_deref(), Some("kept"));
        session.logout();
        assert_eq!(session.state(), SessionState::Anonymous);
    }

    #[test]
    fn memory_store_survives_a_poisoned_lock() {
        let store = std::sync::Arc::new(MemoryTokenStore::new());
        store.save("first").unwrap();

        let poisoner = std::sync::Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.token.lock().unwrap();
            panic!("poison the token lock");
        })
        .join();

        store.save("second").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("second"));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
