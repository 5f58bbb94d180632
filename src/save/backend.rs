//! Storage backends behind the persistence adapter.
//!
//! Two tables, each keyed by user id: `user_progress` holds `User` records and
//! `game_states` holds opaque JSON blobs. Writes are upserts.

use serde_json::Value;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::fs;
#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::shared::User;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed record: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    UserProgress,
    GameStates,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::UserProgress => "user_progress",
            Table::GameStates => "game_states",
        }
    }
}

/// Keys become file names and storage keys, so only `[A-Za-z0-9_-]` is allowed.
pub fn validate_key(user_id: &str) -> Result<(), PersistenceError> {
    let ok = !user_id.is_empty()
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(PersistenceError::InvalidKey(user_id.to_string()))
    }
}

/// Raw JSON document store. Implementations only move documents around;
/// typing happens in `Persistence`.
pub trait PersistenceBackend: Send + Sync + 'static {
    fn put(&mut self, table: Table, user_id: &str, document: &Value) -> Result<(), PersistenceError>;
    fn get(&self, table: Table, user_id: &str) -> Result<Option<Value>, PersistenceError>;

    fn put_user(&mut self, user: &User) -> Result<(), PersistenceError> {
        let document = serde_json::to_value(user)?;
        self.put(Table::UserProgress, &user.id, &document)
    }

    fn get_user(&self, user_id: &str) -> Result<Option<User>, PersistenceError> {
        match self.get(Table::UserProgress, user_id)? {
            Some(document) => Ok(Some(serde_json::from_value(document)?)),
            None => Ok(None),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// MEMORY
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: HashMap<(Table, String), Value>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl PersistenceBackend for MemoryBackend {
    fn put(&mut self, table: Table, user_id: &str, document: &Value) -> Result<(), PersistenceError> {
        validate_key(user_id)?;
        self.tables.insert((table, user_id.to_string()), document.clone());
        Ok(())
    }

    fn get(&self, table: Table, user_id: &str) -> Result<Option<Value>, PersistenceError> {
        validate_key(user_id)?;
        Ok(self.tables.get(&(table, user_id.to_string())).cloned())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FILESYSTEM
// ═══════════════════════════════════════════════════════════════════════

/// One pretty-printed JSON file per record: `<root>/<table>/<user_id>.json`.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `saves/` next to the running executable.
    pub fn beside_executable() -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(exe_dir.join("saves"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, table: Table, user_id: &str) -> PathBuf {
        self.root.join(table.name()).join(format!("{}.json", user_id))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl PersistenceBackend for FileBackend {
    fn put(&mut self, table: Table, user_id: &str, document: &Value) -> Result<(), PersistenceError> {
        validate_key(user_id)?;
        let path = self.record_path(table, user_id);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(document)?;
        // Write to a temp file first, then rename over the old record.
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn get(&self, table: Table, user_id: &str) -> Result<Option<Value>, PersistenceError> {
        validate_key(user_id)?;
        let path = self.record_path(table, user_id);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// BROWSER
// ═══════════════════════════════════════════════════════════════════════

/// `window.localStorage`, keys `farming-comic-game/<table>/<user_id>`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorageBackend;

#[cfg(target_arch = "wasm32")]
impl BrowserStorageBackend {
    fn storage() -> Result<web_sys::Storage, PersistenceError> {
        web_sys::window()
            .ok_or_else(|| PersistenceError::Unavailable("no window".into()))?
            .local_storage()
            .map_err(|e| PersistenceError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| PersistenceError::Unavailable("localStorage disabled".into()))
    }

    fn key(table: Table, user_id: &str) -> String {
        format!("farming-comic-game/{}/{}", table.name(), user_id)
    }
}

#[cfg(target_arch = "wasm32")]
impl PersistenceBackend for BrowserStorageBackend {
    fn put(&mut self, table: Table, user_id: &str, document: &Value) -> Result<(), PersistenceError> {
        validate_key(user_id)?;
        let json = serde_json::to_string(document)?;
        Self::storage()?
            .set_item(&Self::key(table, user_id), &json)
            .map_err(|e| PersistenceError::Unavailable(format!("{:?}", e)))
    }

    fn get(&self, table: Table, user_id: &str) -> Result<Option<Value>, PersistenceError> {
        validate_key(user_id)?;
        let raw = Self::storage()?
            .get_item(&Self::key(table, user_id))
            .map_err(|e| PersistenceError::Unavailable(format!("{:?}", e)))?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_root(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "farming_comic_game_{}_{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_keys_are_validated() {
        assert!(validate_key("user-1_a").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc").is_err());
        let mut mem = MemoryBackend::new();
        assert!(matches!(
            mem.put(Table::GameStates, "a b", &json!(1)),
            Err(PersistenceError::InvalidKey(_))
        ));
        assert!(mem.is_empty());
    }

    #[test]
    fn test_memory_upsert() {
        let mut mem = MemoryBackend::new();
        mem.put(Table::GameStates, "u1", &json!({"v": 1})).unwrap();
        mem.put(Table::GameStates, "u1", &json!({"v": 2})).unwrap();
        assert_eq!(mem.len(), 1);
        assert_eq!(mem.get(Table::GameStates, "u1").unwrap(), Some(json!({"v": 2})));
        assert_eq!(mem.get(Table::UserProgress, "u1").unwrap(), None);
    }

    #[test]
    fn test_file_backend_round_trip() {
        let root = temp_root("file_round_trip");
        let mut files = FileBackend::new(&root);
        assert_eq!(files.get(Table::GameStates, "farmer").unwrap(), None);

        files.put(Table::GameStates, "farmer", &json!({"money": 40})).unwrap();
        files.put(Table::GameStates, "farmer", &json!({"money": 55})).unwrap();
        assert_eq!(
            files.get(Table::GameStates, "farmer").unwrap(),
            Some(json!({"money": 55}))
        );
        assert!(root.join("game_states").join("farmer.json").exists());
        assert!(!root.join("game_states").join("farmer.json.tmp").exists());
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let root = temp_root("corrupt");
        let mut files = FileBackend::new(&root);
        files.put(Table::UserProgress, "bob", &json!({})).unwrap();
        fs::write(root.join("user_progress").join("bob.json"), "{not json").unwrap();
        assert!(matches!(
            files.get(Table::UserProgress, "bob"),
            Err(PersistenceError::Serde(_))
        ));
        // Present but not a User.
        files.put(Table::UserProgress, "bob", &json!({"id": 3})).unwrap();
        assert!(files.get_user("bob").is_err());
        let _ = fs::remove_dir_all(&root);
    }
}
