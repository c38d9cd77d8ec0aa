//! Journal entry operations.

use super::Store;
use crate::subscriptions::MutationKind;
use crate::types::{new_id, now_ms, JournalEntry};
use anyhow::Result;
use tracing::debug;

impl Store {
    /// Save a journal entry.
    ///
    /// With no id, creates a new entry (fresh id, no mood or insight yet)
    /// and prepends it. With an existing id, overwrites `content` and
    /// `image` in place, preserving `created_at`, `mood`, and any insight
    /// already merged. Returns the effective id either way so the caller
    /// can key subsequent enrichment requests. A provided id that no longer
    /// exists changes nothing; the later merges no-op against it.
    pub fn save_entry(
        &self,
        id: Option<&str>,
        content: impl Into<String>,
        image: Option<String>,
    ) -> Result<String> {
        let content = content.into();
        match id {
            Some(id) => {
                let id_owned = id.to_string();
                self.mutate(MutationKind::JournalChanged, move |inner| {
                    match inner.entries.iter_mut().find(|e| e.id == id_owned) {
                        Some(entry) => {
                            entry.content = content;
                            entry.image = image;
                            (id_owned, true)
                        }
                        None => {
                            debug!(entry_id = %id_owned, "save_entry target absent");
                            (id_owned, false)
                        }
                    }
                })
            }
            None => {
                let entry = JournalEntry {
                    id: new_id(),
                    content,
                    created_at: now_ms(),
                    image,
                    mood: None,
                    ai_insight: None,
                };
                let id = entry.id.clone();
                self.mutate(MutationKind::JournalChanged, move |inner| {
                    inner.entries.insert(0, entry);
                    (id, true)
                })
            }
        }
    }

    /// Create a new entry with a classifier-assigned mood. The mood is fixed
    /// here and never overwritten later.
    pub fn create_entry_with_mood(
        &self,
        content: impl Into<String>,
        mood: Option<String>,
    ) -> Result<String> {
        let entry = JournalEntry {
            id: new_id(),
            content: content.into(),
            created_at: now_ms(),
            image: None,
            mood,
            ai_insight: None,
        };
        let id = entry.id.clone();
        self.mutate(MutationKind::JournalChanged, move |inner| {
            inner.entries.insert(0, entry);
            (id, true)
        })
    }

    /// Remove an entry by id. Absent id is a no-op.
    pub fn delete_entry(&self, id: &str) -> Result<bool> {
        self.mutate(MutationKind::JournalChanged, |inner| {
            let before = inner.entries.len();
            inner.entries.retain(|e| e.id != id);
            let removed = inner.entries.len() != before;
            (removed, removed)
        })
    }

    /// Merge an asynchronously produced insight onto an entry, iff it still
    /// exists under the captured id. A result that arrives after deletion
    /// is silently discarded.
    pub fn merge_journal_insight(&self, id: &str, insight: impl Into<String>) -> Result<bool> {
        let insight = insight.into();
        self.mutate(MutationKind::JournalChanged, move |inner| {
            match inner.entries.iter_mut().find(|e| e.id == id) {
                Some(entry) => {
                    entry.ai_insight = Some(insight);
                    (true, true)
                }
                None => {
                    debug!(entry_id = id, "insight target gone, discarding result");
                    (false, false)
                }
            }
        })
    }

    /// Snapshot of all entries, most-recently-created first.
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.read(|inner| inner.entries.clone())
    }

    /// Look up a single entry by id.
    pub fn get_entry(&self, id: &str) -> Option<JournalEntry> {
        self.read(|inner| inner.entries.iter().find(|e| e.id == id).cloned())
    }
}
