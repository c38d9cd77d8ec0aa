//! Durable store adapter.
//!
//! Persistence is a byte-for-byte snapshot mechanism keyed by three fixed
//! document names; it knows nothing about entity semantics. The entity store
//! re-serializes and saves all three documents after every mutation.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// The three top-level persisted documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocKey {
    Tasks,
    Journal,
    Settings,
}

impl DocKey {
    /// Fixed on-disk file name for this document.
    pub fn file_name(&self) -> &'static str {
        match self {
            DocKey::Tasks => "tasks.json",
            DocKey::Journal => "journal.json",
            DocKey::Settings => "settings.json",
        }
    }
}

/// Abstract durable key-value store for the three documents.
///
/// Writes are assumed to eventually succeed; a persistent write failure is a
/// fatal environment condition for the surrounding application to handle.
pub trait DurableStore: Send + Sync {
    /// Load a document. `Ok(None)` means the document has never been written.
    fn load(&self, key: DocKey) -> Result<Option<String>>;

    /// Overwrite a document with a full snapshot.
    fn save(&self, key: DocKey, contents: &str) -> Result<()>;
}

/// File-backed store: one JSON file per document under a data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a file store rooted at `dir`, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating data directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// The directory this store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: DocKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

impl DurableStore for FileStore {
    fn load(&self, key: DocKey) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    fn save(&self, key: DocKey, contents: &str) -> Result<()> {
        let path = self.path_for(key);
        // Write to a sibling temp file and rename so a crash mid-write never
        // leaves a truncated document behind.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryStore {
    docs: Mutex<HashMap<DocKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStore for MemoryStore {
    fn load(&self, key: DocKey) -> Result<Option<String>> {
        Ok(self.docs.lock().unwrap().get(&key).cloned())
    }

    fn save(&self, key: DocKey, contents: &str) -> Result<()> {
        self.docs.lock().unwrap().insert(key, contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_documents() {
        let store = MemoryStore::new();
        assert!(store.load(DocKey::Tasks).unwrap().is_none());

        store.save(DocKey::Tasks, "[]").unwrap();
        assert_eq!(store.load(DocKey::Tasks).unwrap().as_deref(), Some("[]"));

        // Documents are independent.
        assert!(store.load(DocKey::Journal).unwrap().is_none());
    }

    #[test]
    fn file_store_missing_document_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.load(DocKey::Settings).unwrap().is_none());
    }

    #[test]
    fn file_store_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.save(DocKey::Journal, "[{\"id\":\"x\"}]").unwrap();
        assert_eq!(
            store.load(DocKey::Journal).unwrap().as_deref(),
            Some("[{\"id\":\"x\"}]")
        );
        // No temp file left behind.
        assert!(!dir.path().join("journal.json.tmp").exists());
    }
}
