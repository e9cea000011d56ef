use tokio::sync::watch;

use crate::models::{WatchedEntry, WatchlistStats};
use crate::storage::PersistenceStore;

/// The user's watched list, kept in memory and written through to a
/// [`PersistenceStore`] on every change.
///
/// Entry ids are unique and entries stay in insertion order.
pub struct WatchlistStore {
    entries: watch::Sender<Vec<WatchedEntry>>,
    store: PersistenceStore,
}

impl WatchlistStore {
    /// Load the persisted collection and take ownership of the store.
    pub fn open(store: PersistenceStore) -> Self {
        let mut entries = store.load();
        dedup_by_id(&mut entries);
        tracing::debug!(count = entries.len(), "Watched list loaded");

        let (entries, _) = watch::channel(entries);
        Self { entries, store }
    }

    /// Append `entry` unless its id is already present. Returns whether it was
    /// inserted.
    pub fn add(&self, entry: WatchedEntry) -> bool {
        let id = entry.id.clone();
        let inserted = self.entries.send_if_modified(|entries| {
            if entries.iter().any(|e| e.id == entry.id) {
                return false;
            }
            entries.push(entry);
            true
        });

        if inserted {
            tracing::debug!(%id, "Added to watched list");
            self.persist();
        }
        inserted
    }

    /// Remove the entry with `id`. Returns whether anything was removed.
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.entries.send_if_modified(|entries| {
            let before = entries.len();
            entries.retain(|e| e.id != id);
            entries.len() != before
        });

        if removed {
            tracing::debug!(id, "Removed from watched list");
            self.persist();
        }
        removed
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.borrow().iter().any(|e| e.id == id)
    }

    /// The user's rating for `id`, if it is on the list.
    pub fn rating_for(&self, id: &str) -> Option<f32> {
        self.entries
            .borrow()
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.user_rating)
    }

    pub fn summary_stats(&self) -> WatchlistStats {
        WatchlistStats::from_entries(&self.entries.borrow())
    }

    /// Snapshot of the collection in insertion order.
    pub fn entries(&self) -> Vec<WatchedEntry> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Receiver notified after every change to the collection.
    pub fn subscribe(&self) -> watch::Receiver<Vec<WatchedEntry>> {
        self.entries.subscribe()
    }

    fn persist(&self) {
        self.store.save(&self.entries.borrow());
    }
}

/// Keep the first occurrence of each id. Hand-edited files can repeat ids.
fn dedup_by_id(entries: &mut Vec<WatchedEntry>) {
    let mut seen = std::collections::HashSet::new();
    entries.retain(|e| seen.insert(e.id.clone()));
}
