//! Session collaborator: a small string key-value store plus the decoded
//! view of who is signed in.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use shared::protocol::{SessionUser, SESSION_TOKEN_KEY, SESSION_USER_KEY};
use tracing::{debug, warn};

use crate::error::SessionError;

/// Injected storage capability, the equivalent of browser local storage.
pub trait SessionProvider: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn clear(&self, key: &str) -> Result<(), SessionError>;
}

/// Read-only snapshot of the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_role(role: impl Into<String>) -> Self {
        Self {
            token: None,
            role: Some(role.into()),
        }
    }

    /// Reads `token` and `user` from the provider.
    ///
    /// Storage failures and malformed user records degrade to "no role";
    /// they never fail the caller.
    pub fn load(provider: &dyn SessionProvider) -> Self {
        let token = match provider.get(SESSION_TOKEN_KEY) {
            Ok(token) => token.filter(|token| !token.trim().is_empty()),
            Err(err) => {
                warn!(error = %err, "failed to read session token");
                None
            }
        };

        let role = match provider.get(SESSION_USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<SessionUser>(&raw) {
                Ok(user) => user.role,
                Err(err) => {
                    warn!(error = %err, "ignoring malformed session user record");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "failed to read session user record");
                None
            }
        };

        Self {
            token,
            role: role.filter(|role| !role.trim().is_empty()),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// Persists a fresh sign-in.
    pub fn store(
        provider: &dyn SessionProvider,
        token: &str,
        user: &SessionUser,
    ) -> Result<(), SessionError> {
        provider.set(SESSION_TOKEN_KEY, token)?;
        provider.set(SESSION_USER_KEY, &serde_json::to_string(user)?)?;
        Ok(())
    }

    /// Removes both credential keys.
    pub fn forget(provider: &dyn SessionProvider) -> Result<(), SessionError> {
        provider.clear(SESSION_TOKEN_KEY)?;
        provider.clear(SESSION_USER_KEY)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        {
            let mut guard = store.lock();
            for (key, value) in entries {
                guard.insert(key.to_string(), value.to_string());
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned map is still a valid map.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionProvider for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), SessionError> {
        self.lock().remove(key);
        Ok(())
    }
}

/// JSON file holding the key-value map, rewritten on every mutation.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(source) => return Err(self.io_error(source)),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let raw = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, raw).map_err(|source| self.io_error(source))?;
        debug!(path = %self.path.display(), keys = map.len(), "session store written");
        Ok(())
    }

    fn mutate(
        &self,
        apply: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), SessionError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut map = self.read_map()?;
        apply(&mut map);
        self.write_map(&map)
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl SessionProvider for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.mutate(|map| {
            map.insert(key.to_string(), value.to_string());
        })
    }

    fn clear(&self, key: &str) -> Result<(), SessionError> {
        self.mutate(|map| {
            map.remove(key);
        })
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
