//! Persistent key-value state, the terminal counterpart of browser local storage.
//!
//! Values are strings kept in a flat JSON object and written through on every
//! change. There is no TTL and no namespacing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Key under which the last primary city selection is stored.
pub const SELECTED_CITY_KEY: &str = "selectedCity";

#[derive(Debug, Default)]
pub struct KeyValueStore {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl KeyValueStore {
    /// Open the store backed by `path`. A missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| StorageError::Read(format!("{}: {}", path.display(), e)))?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents)
                    .map_err(|e| StorageError::Corrupt(format!("{}: {}", path.display(), e)))?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!("Opened state store at {} ({} keys)", path.display(), entries.len());

        Ok(Self {
            path: Some(path.to_path_buf()),
            entries,
        })
    }

    /// An empty store that overwrites whatever is at `path` on first write.
    pub fn empty(path: &Path) -> Self {
        Self {
            path: Some(path.to_path_buf()),
            entries: BTreeMap::new(),
        }
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn flush(&self) -> Result<(), StorageError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::Write(format!("{}: {}", parent.display(), e)))?;
        }

        let contents = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| StorageError::Write(e.to_string()))?;

        // Replace via rename so a crash never leaves a half-written file.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)
            .map_err(|e| StorageError::Write(format!("{}: {}", tmp.display(), e)))?;
        std::fs::rename(&tmp, path)
            .map_err(|e| StorageError::Write(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = KeyValueStore::open(&dir.path().join("state.json")).unwrap();
        assert_eq!(store.get(SELECTED_CITY_KEY), None);
    }

    #[test]
    fn test_set_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let mut store = KeyValueStore::open(&path).unwrap();
        store.set(SELECTED_CITY_KEY, "Paris").unwrap();
        store.set(SELECTED_CITY_KEY, "Arles").unwrap();

        let reopened = KeyValueStore::open(&path).unwrap();
        assert_eq!(reopened.get(SELECTED_CITY_KEY), Some("Arles"));
    }

    #[test]
    fn test_file_uses_browser_style_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut store = KeyValueStore::open(&path).unwrap();
        store.set(SELECTED_CITY_KEY, "Paris").unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"selectedCity\": \"Paris\""), "raw: {raw}");
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = KeyValueStore::open(&path).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt(_)));
    }
}
