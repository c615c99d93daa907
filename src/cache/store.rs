//! Cache persistence backends
//!
//! The cache owns its in-memory view; a `CacheStore` only loads and persists
//! the whole map. The file store writes through a temp file and renames so a
//! crash mid-write never leaves a torn JSON file behind.

use crate::cache::CacheEntry;
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Persistence backend for a cache namespace
pub trait CacheStore: Send {
    /// Load all entries, empty when no previous state exists
    fn load(&self) -> Result<BTreeMap<String, CacheEntry>>;

    /// Persist the full entry map
    fn persist(&self, entries: &BTreeMap<String, CacheEntry>) -> Result<()>;
}

/// JSON file backend with atomic rename-on-write
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl CacheStore for FileStore {
    fn load(&self) -> Result<BTreeMap<String, CacheEntry>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| Error::Cache(format!("Failed to read {}: {}", self.path.display(), e)))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::Cache(format!("Failed to parse {}: {}", self.path.display(), e)))
    }

    fn persist(&self, entries: &BTreeMap<String, CacheEntry>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Cache(format!("Failed to create cache directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(entries)?;

        // Write to a sibling temp file, then rename into place.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .map_err(|e| Error::Cache(format!("Failed to write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| Error::Cache(format!("Failed to replace {}: {}", self.path.display(), e)))?;

        Ok(())
    }
}

/// In-memory backend for tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, CacheEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryStore {
    fn load(&self) -> Result<BTreeMap<String, CacheEntry>> {
        Ok(self.entries.lock().expect("store poisoned").clone())
    }

    fn persist(&self, entries: &BTreeMap<String, CacheEntry>) -> Result<()> {
        *self.entries.lock().expect("store poisoned") = entries.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn entry(value: serde_json::Value) -> CacheEntry {
        CacheEntry {
            payload: value,
            timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nope.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("cache.json"));

        let mut entries = BTreeMap::new();
        entries.insert("k".to_string(), entry(json!({"data": 1})));
        store.persist(&entries).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded["k"].payload, json!({"data": 1}));
    }

    #[test]
    fn test_file_store_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("cache.json"));
        store.persist(&BTreeMap::new()).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["cache.json"]);
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        let mut entries = BTreeMap::new();
        entries.insert("k".to_string(), entry(json!("v")));
        store.persist(&entries).unwrap();
        assert_eq!(store.load().unwrap()["k"].payload, json!("v"));
    }
}
