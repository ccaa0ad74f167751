//! # Persistent Slots and the Key-Value Abstraction
//!
//! The engine never touches a concrete storage API. Everything persistent
//! goes through the [`KeyValueStore`] trait: `get`/`set`/`remove` over string
//! keys, synchronous and total — an absent key is `None`, never an error.
//! The production binding may be a file, a browser-storage shim, or a
//! database row; tests use [`MemoryStore`].
//!
//! [`SnapshotStore`] layers the session's named slots on top of a boxed
//! store: the four data slots (core data, source snapshot, local edits,
//! merged data) plus the source context and the repository link list. It is
//! the single logical owner of that data; other components borrow read
//! access, and local-edit writes are mediated by the source manager.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::context::SourceContext;
use crate::document::SourceDocument;
use crate::error::{Error, Result};
use crate::links::RepositoryLink;
use crate::model::{MergedSystem, TokenSystem};

/// Fixed string keys addressing the persistent slots.
pub mod keys {
    pub const CORE_DATA: &str = "token-loom:core-data";
    pub const SOURCE_SNAPSHOT: &str = "token-loom:source-snapshot";
    pub const LOCAL_EDITS: &str = "token-loom:local-edits";
    pub const MERGED_DATA: &str = "token-loom:merged-data";
    pub const SOURCE_CONTEXT: &str = "token-loom:source-context";
    pub const REPOSITORY_LINKS: &str = "token-loom:repository-links";
}

/// Minimal injected persistence interface.
pub trait KeyValueStore {
    /// Fetch a value; absent keys return `None`, never an error.
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value, replacing any previous one (last write wins).
    fn set(&mut self, key: &str, value: String);

    /// Remove a value if present.
    fn remove(&mut self, key: &str);
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// File-backed store: one JSON object per state file, written atomically
/// enough for a single-session tool (write-then-rename is not needed since
/// the store is single-owner by design).
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStore {
    /// Open (or create) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(&raw).map_err(|e| Error::Storage {
                    key: path.display().to_string(),
                    message: format!("state file is not a JSON string map: {}", e),
                })?
            }
        } else {
            HashMap::new()
        };
        Ok(Self { path, entries })
    }

    /// Default state file location under the platform data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("token-loom")
            .join("state.json")
    }

    fn flush(&self) {
        // Persistence failures are non-fatal for the in-memory session; log
        // and carry on so setters stay total.
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("failed to create state directory {}: {}", parent.display(), e);
                return;
            }
        }
        match serde_json::to_string_pretty(&self.entries) {
            Ok(raw) => {
                if let Err(e) = fs::write(&self.path, raw) {
                    log::warn!("failed to persist state to {}: {}", self.path.display(), e);
                }
            }
            Err(e) => log::warn!("failed to serialize state: {}", e),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
        self.flush();
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
        self.flush();
    }
}

/// The session's named slots over an injected key-value store.
pub struct SnapshotStore {
    store: Box<dyn KeyValueStore>,
}

impl SnapshotStore {
    /// Wrap an injected store.
    pub fn with_store(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Convenience constructor over a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::with_store(Box::new(MemoryStore::new()))
    }

    fn get_typed<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(key) {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| Error::Storage {
                    key: key.to_string(),
                    message: format!("stored value failed to decode: {}", e),
                }),
        }
    }

    fn set_typed<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, raw);
        Ok(())
    }

    pub fn core_data(&self) -> Result<Option<TokenSystem>> {
        self.get_typed(keys::CORE_DATA)
    }

    pub fn set_core_data(&mut self, system: &TokenSystem) -> Result<()> {
        self.set_typed(keys::CORE_DATA, system)
    }

    pub fn source_snapshot(&self) -> Result<Option<SourceDocument>> {
        self.get_typed(keys::SOURCE_SNAPSHOT)
    }

    pub fn set_source_snapshot(&mut self, doc: &SourceDocument) -> Result<()> {
        self.set_typed(keys::SOURCE_SNAPSHOT, doc)
    }

    pub fn local_edits(&self) -> Result<Option<SourceDocument>> {
        self.get_typed(keys::LOCAL_EDITS)
    }

    /// Crate-internal: all external writes go through the source manager so
    /// the session has a single coordinated writer.
    pub(crate) fn set_local_edits(&mut self, doc: &SourceDocument) -> Result<()> {
        self.set_typed(keys::LOCAL_EDITS, doc)
    }

    pub fn merged_data(&self) -> Result<Option<MergedSystem>> {
        self.get_typed(keys::MERGED_DATA)
    }

    pub(crate) fn set_merged_data(&mut self, merged: &MergedSystem) -> Result<()> {
        self.set_typed(keys::MERGED_DATA, merged)
    }

    pub fn source_context(&self) -> Result<Option<SourceContext>> {
        self.get_typed(keys::SOURCE_CONTEXT)
    }

    pub fn set_source_context(&mut self, context: &SourceContext) -> Result<()> {
        self.set_typed(keys::SOURCE_CONTEXT, context)
    }

    pub fn repository_links(&self) -> Result<Vec<RepositoryLink>> {
        Ok(self.get_typed(keys::REPOSITORY_LINKS)?.unwrap_or_default())
    }

    pub fn set_repository_links(&mut self, links: &[RepositoryLink]) -> Result<()> {
        self.set_typed(keys::REPOSITORY_LINKS, &links)
    }

    /// Clear every slot (explicit session reset).
    pub fn reset(&mut self) {
        for key in [
            keys::CORE_DATA,
            keys::SOURCE_SNAPSHOT,
            keys::LOCAL_EDITS,
            keys::MERGED_DATA,
            keys::SOURCE_CONTEXT,
            keys::REPOSITORY_LINKS,
        ] {
            self.store.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_system() -> TokenSystem {
        serde_json::from_value(json!({"systemId": "design-system"})).unwrap()
    }

    #[test]
    fn test_memory_store_get_set_remove() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("missing"), None);

        store.set("key", "value".to_string());
        assert_eq!(store.get("key").as_deref(), Some("value"));

        store.set("key", "replaced".to_string());
        assert_eq!(store.get("key").as_deref(), Some("replaced"));

        store.remove("key");
        assert_eq!(store.get("key"), None);
    }

    #[test]
    fn test_snapshot_store_round_trips_slots() {
        let mut store = SnapshotStore::in_memory();
        assert!(store.core_data().unwrap().is_none());

        let system = sample_system();
        store.set_core_data(&system).unwrap();
        assert_eq!(store.core_data().unwrap(), Some(system.clone()));

        let doc = SourceDocument::Core(system);
        store.set_source_snapshot(&doc).unwrap();
        store.set_local_edits(&doc).unwrap();
        assert_eq!(store.source_snapshot().unwrap(), Some(doc.clone()));
        assert_eq!(store.local_edits().unwrap(), Some(doc));
    }

    #[test]
    fn test_snapshot_store_decode_failure_is_storage_error() {
        let mut inner = MemoryStore::new();
        inner.set(keys::CORE_DATA, "not json".to_string());
        let store = SnapshotStore::with_store(Box::new(inner));
        assert!(matches!(
            store.core_data(),
            Err(Error::Storage { .. })
        ));
    }

    #[test]
    fn test_snapshot_store_reset_clears_everything() {
        let mut store = SnapshotStore::in_memory();
        store.set_core_data(&sample_system()).unwrap();
        store.reset();
        assert!(store.core_data().unwrap().is_none());
        assert!(store.repository_links().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_round_trips_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        {
            let mut store = FileStore::open(&path).unwrap();
            store.set("key", "value".to_string());
        }

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("key").as_deref(), Some("value"));
    }

    #[test]
    fn test_file_store_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("absent.json")).unwrap();
        assert_eq!(store.get("anything"), None);
    }

    #[test]
    fn test_file_store_rejects_malformed_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(matches!(
            FileStore::open(&path),
            Err(Error::Storage { .. })
        ));
    }
}
