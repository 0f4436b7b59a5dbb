//! Session persistence.
//!
//! The session is stored in `<TALLER_HOME>/session.json` as a flat key-value
//! object under two fixed keys: the token and the serialized user record.
//! The file is written with restricted permissions (0600). Tokens are never
//! logged or displayed in full.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use taller_types::{Session, User};

use crate::config::paths;

/// Key holding the authentication token.
pub const TOKEN_KEY: &str = "pb_auth_token";
/// Key holding the serialized user record.
pub const USER_KEY: &str = "pb_auth_user";

/// Read/write/clear access to the persisted session.
pub trait SessionStore: Send + Sync {
    /// Returns the stored session, if both token and user are present.
    fn get(&self) -> Result<Option<Session>>;

    /// Replaces the stored session.
    fn set(&self, session: &Session) -> Result<()>;

    /// Removes the stored session. Returns true if one was present.
    fn clear(&self) -> Result<bool>;
}

/// Session store backed by a JSON key-value file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location under `TALLER_HOME`.
    pub fn at_default_path() -> Self {
        Self::new(paths::session_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_entries(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session from {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session from {}", self.path.display()))
    }

    fn save_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(entries).context("Failed to serialize session")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents)
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Result<Option<Session>> {
        let entries = self.load_entries()?;
        let (Some(token), Some(user_json)) = (entries.get(TOKEN_KEY), entries.get(USER_KEY)) else {
            return Ok(None);
        };
        if token.trim().is_empty() {
            return Ok(None);
        }

        let user: User = serde_json::from_str(user_json).with_context(|| {
            format!("Failed to parse stored user in {}", self.path.display())
        })?;

        Ok(Some(Session {
            token: token.clone(),
            user,
        }))
    }

    fn set(&self, session: &Session) -> Result<()> {
        let mut entries = self.load_entries().unwrap_or_default();
        let user_json = serde_json::to_string(&session.user).context("Failed to serialize user")?;
        entries.insert(TOKEN_KEY.to_string(), session.token.clone());
        entries.insert(USER_KEY.to_string(), user_json);
        self.save_entries(&entries)?;

        tracing::debug!(
            path = %self.path.display(),
            token = %mask_token(&session.token),
            "session saved"
        );
        Ok(())
    }

    fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }

        // A corrupt file still gets wiped.
        let mut entries = self.load_entries().unwrap_or_default();
        let had_token = entries.remove(TOKEN_KEY).is_some();
        let had_user = entries.remove(USER_KEY).is_some();

        if entries.is_empty() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        } else {
            self.save_entries(&entries)?;
        }

        tracing::debug!(path = %self.path.display(), "session cleared");
        Ok(had_token || had_user)
    }
}

/// In-process session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        // A poisoned lock only means a panic elsewhere; the data is still usable.
        self.session
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Result<Option<Session>> {
        Ok(self.slot().clone())
    }

    fn set(&self, session: &Session) -> Result<()> {
        *self.slot() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<bool> {
        Ok(self.slot().take().is_some())
    }
}

/// Shortens a token for display.
pub fn mask_token(token: &str) -> String {
    if token.chars().count() <= 16 {
        return "***".to_string();
    }
    let prefix: String = token.chars().take(12).collect();
    format!("{prefix}...")
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn session() -> Session {
        Session {
            token: "eyJhbGciOiJIUzI1NiJ9.payload.signature".to_string(),
            user: User {
                id: "user123".to_string(),
                email: "maria@example.com".to_string(),
                username: Some("maria".to_string()),
                name: None,
            },
        }
    }

    #[test]
    fn test_missing_file_reads_as_no_session() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        assert_eq!(store.get().unwrap(), None);
        assert!(!store.clear().unwrap());
    }

    #[test]
    fn test_set_then_get_returns_session() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));

        store.set(&session()).unwrap();
        assert_eq!(store.get().unwrap(), Some(session()));
    }

    #[test]
    fn test_file_uses_fixed_keys_and_serialized_user() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileSessionStore::new(&path);
        store.set(&session()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[TOKEN_KEY], session().token);
        let user_json = raw[USER_KEY].as_str().unwrap();
        assert!(user_json.contains("\"id\":\"user123\""));
    }

    #[test]
    fn test_token_without_user_is_no_session() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"pb_auth_token":"abc"}"#).unwrap();

        let store = FileSessionStore::new(&path);
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_clear_removes_file_and_reports_presence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileSessionStore::new(&path);
        store.set(&session()).unwrap();

        assert!(store.clear().unwrap());
        assert!(!path.exists());
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_clear_wipes_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileSessionStore::new(&path);
        assert!(store.get().is_err());
        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        FileSessionStore::new(&path).set(&session()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get().unwrap(), None);
        store.set(&session()).unwrap();
        assert!(store.get().unwrap().is_some());
        assert!(store.clear().unwrap());
        assert!(!store.clear().unwrap());
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("short"), "***");
        assert_eq!(mask_token(&session().token), "eyJhbGciOiJI...");
    }
}
