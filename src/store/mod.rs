//! Entity store: the authoritative in-memory collections and the single
//! mutation surface every other component goes through.
//!
//! The store owns all `Task` and `JournalEntry` instances. Mutations are
//! synchronous and atomic under one lock; each mutation re-serializes the
//! full snapshot to the durable store and notifies subscribers. Enrichment
//! results are merged back exclusively through the id-checked operations in
//! the per-area modules, so a result that outlives its target degrades to a
//! silent no-op.

pub mod journal;
pub mod settings;
pub mod tasks;

use crate::persist::{DocKey, DurableStore, MemoryStore};
use crate::subscriptions::{MutationKind, SubscriptionManager};
use crate::types::{AppSettings, JournalEntry, Task};
use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::warn;

/// In-memory state behind the store lock. Both collections are kept
/// most-recently-created first by prepending at mutation time.
pub(crate) struct StoreInner {
    pub(crate) tasks: Vec<Task>,
    pub(crate) entries: Vec<JournalEntry>,
    pub(crate) settings: AppSettings,
}

impl StoreInner {
    /// Load the three documents, each parsed independently. A corrupt or
    /// missing document falls back to an empty collection or defaults
    /// rather than aborting startup.
    fn load_from(durable: &dyn DurableStore) -> Result<Self> {
        let tasks = load_collection(durable, DocKey::Tasks)?;
        let entries = load_collection(durable, DocKey::Journal)?;
        let settings = match durable.load(DocKey::Settings)? {
            Some(raw) => settings::decode_lenient(&raw),
            None => AppSettings::default(),
        };
        Ok(Self {
            tasks,
            entries,
            settings,
        })
    }
}

fn load_collection<T: serde::de::DeserializeOwned>(
    durable: &dyn DurableStore,
    key: DocKey,
) -> Result<Vec<T>> {
    match durable.load(key)? {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                warn!(document = key.file_name(), error = %e, "Corrupt document, starting empty");
                Ok(Vec::new())
            }
        },
        None => Ok(Vec::new()),
    }
}

/// Shared handle to the entity store.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Mutex<StoreInner>>,
    durable: Arc<dyn DurableStore>,
    subscriptions: Arc<SubscriptionManager>,
}

impl Store {
    /// Open the store, loading the persisted documents once.
    pub fn open(durable: Arc<dyn DurableStore>) -> Result<Self> {
        let inner = StoreInner::load_from(durable.as_ref())?;
        Ok(Self {
            inner: Arc::new(Mutex::new(inner)),
            durable,
            subscriptions: Arc::new(SubscriptionManager::new()),
        })
    }

    /// Open a store backed by memory only (for testing).
    pub fn in_memory() -> Result<Self> {
        Self::open(Arc::new(MemoryStore::new()))
    }

    /// Subscribe to mutation notifications.
    pub fn subscribe(&self) -> UnboundedReceiver<MutationKind> {
        self.subscriptions.subscribe()
    }

    /// Run a read-only closure against the current snapshot.
    pub(crate) fn read<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&StoreInner) -> T,
    {
        let inner = self.inner.lock().unwrap();
        f(&inner)
    }

    /// Apply a mutation under the store lock. The closure returns its result
    /// plus whether anything actually changed; a no-op (absent id) skips the
    /// persistence write and the notification.
    pub(crate) fn mutate<F, T>(&self, kind: MutationKind, f: F) -> Result<T>
    where
        F: FnOnce(&mut StoreInner) -> (T, bool),
    {
        let (result, changed) = {
            let mut inner = self.inner.lock().unwrap();
            let (result, changed) = f(&mut inner);
            if changed {
                self.persist_all(&inner)?;
            }
            (result, changed)
        };
        if changed {
            self.subscriptions.notify(kind);
        }
        Ok(result)
    }

    /// Re-serialize all three documents. Writes are not batched within a
    /// single user action; write amplification is accepted for mutation
    /// simplicity.
    fn persist_all(&self, inner: &StoreInner) -> Result<()> {
        let tasks = serde_json::to_string_pretty(&inner.tasks).context("serializing tasks")?;
        let entries =
            serde_json::to_string_pretty(&inner.entries).context("serializing journal")?;
        let settings =
            serde_json::to_string_pretty(&inner.settings).context("serializing settings")?;
        self.durable.save(DocKey::Tasks, &tasks)?;
        self.durable.save(DocKey::Journal, &entries)?;
        self.durable.save(DocKey::Settings, &settings)?;
        Ok(())
    }
}
