//! Integer key-value persistence
//!
//! The game only ever stores the high score, but stores are keyed so a board
//! with flash preferences and a desktop build with a JSON file look the same
//! to the simulation.
//!
//! Stores never surface errors to the game: a failed read yields the
//! caller's default and a failed write is logged and dropped.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Non-volatile integer storage
pub trait ScoreStore {
    /// Value under `key`, or `default` when absent or unreadable
    fn load_int(&self, key: &str, default: i32) -> i32;
    fn store_int(&mut self, key: &str, value: i32);
}

/// Volatile store, for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, i32>,
    writes: usize,
}

impl MemoryStore {
    /// Number of `store_int` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ScoreStore for MemoryStore {
    fn load_int(&self, key: &str, default: i32) -> i32 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn store_int(&mut self, key: &str, value: i32) {
        self.values.insert(key.to_owned(), value);
        self.writes += 1;
    }
}

/// Store file errors
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store file malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Store backed by a flat JSON object of integers, rewritten on every store
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, i32>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn try_open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }

    /// Open the store at `path`, starting empty if the file can't be read
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::try_open(path.clone()) {
            Ok(store) => {
                log::info!("Opened score store {} ({} keys)", path.display(), store.values.len());
                store
            }
            Err(e) => {
                log::warn!("{e}; starting {} empty", path.display());
                Self {
                    path,
                    values: BTreeMap::new(),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current contents to disk
    pub fn flush(&self) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl ScoreStore for JsonFileStore {
    fn load_int(&self, key: &str, default: i32) -> i32 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn store_int(&mut self, key: &str, value: i32) {
        self.values.insert(key.to_owned(), value);
        if let Err(e) = self.flush() {
            log::warn!("Failed to save {key}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("oled-asteroids-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_memory_store_default() {
        let mut store = MemoryStore::default();
        assert_eq!(store.load_int("highScore", 0), 0);
        store.store_int("highScore", 1200);
        assert_eq!(store.load_int("highScore", 0), 1200);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_json_store_persists() {
        let path = temp_path("persist.json");
        let _ = std::fs::remove_file(&path);

        let mut store = JsonFileStore::open(&path);
        assert_eq!(store.load_int("highScore", 7), 7);
        store.store_int("highScore", 3450);

        let reopened = JsonFileStore::try_open(&path).unwrap();
        assert_eq!(reopened.load_int("highScore", 0), 3450);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_opens_empty() {
        let path = temp_path("corrupt.json");
        std::fs::write(&path, "{ highScore: ").unwrap();

        assert!(matches!(
            JsonFileStore::try_open(&path),
            Err(PersistenceError::Json(_))
        ));
        let store = JsonFileStore::open(&path);
        assert_eq!(store.load_int("highScore", 0), 0);
        let _ = std::fs::remove_file(&path);
    }
}
