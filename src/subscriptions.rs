//! Store mutation notifications.
//!
//! Every entity store mutation reports a [`MutationKind`] describing which
//! top-level collection changed. Subscribers (a UI, the CLI's watch mode, a
//! test) receive the kinds over an unbounded channel and re-read the store
//! snapshot as needed. The manager stores the live senders and prunes any
//! whose receiver has been dropped.

use std::sync::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Categories of mutations, one per top-level persisted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    /// A task was created, updated, toggled, or deleted.
    TaskChanged,
    /// A journal entry was created, overwritten, enriched, or deleted.
    JournalChanged,
    /// A settings field changed.
    SettingsChanged,
}

/// Fan-out point for store change notifications.
///
/// Thread-safe: uses an internal `Mutex` so it can be shared across async
/// tasks without requiring `&mut self`.
pub struct SubscriptionManager {
    senders: Mutex<Vec<UnboundedSender<MutationKind>>>,
}

impl SubscriptionManager {
    /// Create a new manager with no subscribers.
    pub fn new() -> Self {
        Self {
            senders: Mutex::new(Vec::new()),
        }
    }

    /// Register a new subscriber and return its receiving end.
    pub fn subscribe(&self) -> UnboundedReceiver<MutationKind> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.lock().unwrap().push(tx);
        rx
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.senders.lock().unwrap().len()
    }

    /// Deliver a mutation kind to every live subscriber, dropping senders
    /// whose receiver has gone away.
    pub fn notify(&self, kind: MutationKind) {
        let mut senders = self.senders.lock().unwrap();
        senders.retain(|tx| tx.send(kind).is_ok());
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriber_receives_notifications_in_order() {
        let mgr = SubscriptionManager::new();
        let mut rx = mgr.subscribe();

        mgr.notify(MutationKind::TaskChanged);
        mgr.notify(MutationKind::JournalChanged);

        assert_eq!(rx.try_recv().unwrap(), MutationKind::TaskChanged);
        assert_eq!(rx.try_recv().unwrap(), MutationKind::JournalChanged);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropped_subscriber_is_pruned_on_notify() {
        let mgr = SubscriptionManager::new();
        let rx = mgr.subscribe();
        assert_eq!(mgr.subscriber_count(), 1);

        drop(rx);
        mgr.notify(MutationKind::TaskChanged);
        assert_eq!(mgr.subscriber_count(), 0);
    }

    #[test]
    fn notify_without_subscribers_is_harmless() {
        let mgr = SubscriptionManager::new();
        mgr.notify(MutationKind::SettingsChanged);
    }
}
