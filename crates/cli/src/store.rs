//! Persisted guest lists.
//!
//! A [`LocalListStore`] owns one storage slot and applies its list's
//! insertion policy. Storage is best effort: read failures and corrupt values
//! read as an empty list, write failures are dropped, and both are logged and
//! counted.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use shelf_core::list::{self, InsertOutcome, ListKind};
use shelf_core::{ListEntry, ProductId};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::storage::LocalStorage;

/// Buffered change notifications per subscriber.
const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// A stored list value that could not be understood.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid list JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a stored list value.
///
/// Elements that are not valid entries (for example a blank id) are skipped;
/// the second value counts them.
///
/// # Errors
///
/// Returns an error if the value is not a JSON array.
pub fn parse_entries(raw: &str) -> Result<(Vec<ListEntry>, usize), ParseError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(raw)?;
    let total = values.len();

    let entries: Vec<ListEntry> = values
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();

    let skipped = total - entries.len();
    Ok((entries, skipped))
}

/// One persisted guest list.
pub struct LocalListStore<S> {
    storage: Arc<S>,
    kind: ListKind,
    failures: AtomicUsize,
    changes: Option<broadcast::Sender<Vec<ListEntry>>>,
}

impl<S: LocalStorage> LocalListStore<S> {
    /// Open the slot for `kind`. The comparison list broadcasts its changes.
    #[must_use]
    pub fn new(storage: Arc<S>, kind: ListKind) -> Self {
        let changes = (kind == ListKind::Comparison)
            .then(|| broadcast::channel(CHANGE_CHANNEL_CAPACITY).0);

        Self {
            storage,
            kind,
            failures: AtomicUsize::new(0),
            changes,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ListKind {
        self.kind
    }

    /// Storage and parse failures swallowed so far.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    /// Receive the list after every change. Only the comparison list has a
    /// channel; delivery is not guaranteed and nothing is replayed.
    #[must_use]
    pub fn subscribe(&self) -> Option<broadcast::Receiver<Vec<ListEntry>>> {
        self.changes.as_ref().map(broadcast::Sender::subscribe)
    }

    fn swallowed(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    fn notify(&self, entries: &[ListEntry]) {
        if let Some(tx) = &self.changes {
            // No subscribers is fine
            let _ = tx.send(entries.to_vec());
        }
    }

    /// The stored list, or empty when storage is missing, unreadable or corrupt.
    #[must_use]
    pub fn get(&self) -> Vec<ListEntry> {
        let key = self.kind.storage_key();

        let raw = match self.storage.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key, error = %e, "Local storage read failed");
                self.swallowed();
                return Vec::new();
            }
        };

        let mut entries = match parse_entries(&raw) {
            Ok((entries, 0)) => entries,
            Ok((entries, skipped)) => {
                tracing::warn!(key, skipped, "Skipped invalid local list entries");
                entries
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring corrupt local list");
                self.swallowed();
                return Vec::new();
            }
        };

        let dropped = list::normalize(self.kind, &mut entries);
        if dropped > 0 {
            tracing::debug!(key, dropped, "Normalized stored list");
        }
        entries
    }

    /// Overwrite the stored list.
    pub fn save(&self, entries: &[ListEntry]) {
        let key = self.kind.storage_key();

        let result = serde_json::to_string(entries)
            .map_err(|e| e.to_string())
            .and_then(|value| self.storage.set_item(key, &value).map_err(|e| e.to_string()));

        if let Err(error) = result {
            tracing::warn!(key, error = %error, "Local storage write failed");
            self.swallowed();
        }

        self.notify(entries);
    }

    /// Insert according to this list's policy.
    pub fn add(&self, entry: ListEntry) -> InsertOutcome {
        let mut entries = self.get();
        let outcome = list::insert(self.kind, &mut entries, entry);
        if outcome.changed() {
            self.save(&entries);
        }
        outcome
    }

    /// Remove by id. Returns whether the id was present.
    pub fn remove(&self, id: &ProductId) -> bool {
        let mut entries = self.get();
        let removed = list::remove(&mut entries, id);
        if removed {
            self.save(&entries);
        }
        removed
    }

    /// Add if absent, remove if present. Returns whether the id is present
    /// afterwards.
    pub fn toggle(&self, entry: ListEntry) -> bool {
        if self.remove(&entry.id) {
            return false;
        }
        self.add(entry).changed()
    }

    /// Delete the stored list.
    pub fn clear(&self) {
        let key = self.kind.storage_key();
        if let Err(e) = self.storage.remove_item(key) {
            tracing::warn!(key, error = %e, "Local storage clear failed");
            self.swallowed();
        }
        self.notify(&[]);
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        list::contains(&self.get(), id)
    }

    /// Ids in list order.
    #[must_use]
    pub fn ids(&self) -> Vec<ProductId> {
        self.get().into_iter().map(|entry| entry.id).collect()
    }
}
