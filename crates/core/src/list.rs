//! Insertion policies for the guest product lists.
//!
//! Three lists share one entry shape but differ in how they grow:
//!
//! | List             | Order               | Duplicate insert | Capacity | Over capacity |
//! |------------------|---------------------|------------------|----------|---------------|
//! | Wishlist         | insertion           | ignored          | none     | n/a           |
//! | Recently viewed  | most recent first   | moved to front   | 12       | evict oldest  |
//! | Comparison       | insertion           | ignored          | 4        | reject        |
//!
//! The functions here are pure; persistence lives in the client crate.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{ListEntry, ProductId};

/// Maximum number of recently viewed products kept.
pub const RECENTLY_VIEWED_CAPACITY: usize = 12;

/// Maximum number of products that can be compared at once.
pub const COMPARISON_CAPACITY: usize = 4;

/// Which guest list an operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Wishlist,
    RecentlyViewed,
    Comparison,
}

impl ListKind {
    /// All list kinds.
    pub const ALL: [Self; 3] = [Self::Wishlist, Self::RecentlyViewed, Self::Comparison];

    /// Key of the slot this list occupies in local storage.
    #[must_use]
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::Wishlist => "shelf.wishlist",
            Self::RecentlyViewed => "shelf.recently_viewed",
            Self::Comparison => "shelf.comparison",
        }
    }

    /// Maximum number of entries, if the list is bounded.
    #[must_use]
    pub const fn capacity(self) -> Option<usize> {
        match self {
            Self::Wishlist => None,
            Self::RecentlyViewed => Some(RECENTLY_VIEWED_CAPACITY),
            Self::Comparison => Some(COMPARISON_CAPACITY),
        }
    }

    /// Human-readable name for logs and CLI output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Wishlist => "wishlist",
            Self::RecentlyViewed => "recently viewed",
            Self::Comparison => "comparison",
        }
    }
}

/// Result of inserting an entry into a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The entry was added. For recently viewed, the entry pushed out by the
    /// capacity limit is returned.
    Added { evicted: Option<ListEntry> },
    /// An entry with the same id was already present; nothing changed.
    AlreadyPresent,
    /// The entry was already present and has been moved to the front.
    MovedToFront,
    /// The list is full and does not evict; nothing changed.
    Rejected { capacity: usize },
}

impl InsertOutcome {
    /// Whether the list was modified.
    #[must_use]
    pub const fn changed(&self) -> bool {
        matches!(self, Self::Added { .. } | Self::MovedToFront)
    }
}

/// Insert `entry` into `list` following the policy of `kind`.
pub fn insert(kind: ListKind, list: &mut Vec<ListEntry>, entry: ListEntry) -> InsertOutcome {
    let existing = position(list, &entry.id);

    match kind {
        ListKind::Wishlist => {
            if existing.is_some() {
                return InsertOutcome::AlreadyPresent;
            }
            list.push(entry);
            InsertOutcome::Added { evicted: None }
        }
        ListKind::RecentlyViewed => {
            if let Some(idx) = existing {
                list.remove(idx);
                list.insert(0, entry);
                return InsertOutcome::MovedToFront;
            }
            list.insert(0, entry);
            let evicted = if list.len() > RECENTLY_VIEWED_CAPACITY {
                list.pop()
            } else {
                None
            };
            InsertOutcome::Added { evicted }
        }
        ListKind::Comparison => {
            if existing.is_some() {
                return InsertOutcome::AlreadyPresent;
            }
            if list.len() >= COMPARISON_CAPACITY {
                return InsertOutcome::Rejected {
                    capacity: COMPARISON_CAPACITY,
                };
            }
            list.push(entry);
            InsertOutcome::Added { evicted: None }
        }
    }
}

/// Remove the entry with `id`. Returns whether anything was removed.
pub fn remove(list: &mut Vec<ListEntry>, id: &ProductId) -> bool {
    let before = list.len();
    list.retain(|entry| &entry.id != id);
    list.len() != before
}

/// Whether `list` holds an entry with `id`.
#[must_use]
pub fn contains(list: &[ListEntry], id: &ProductId) -> bool {
    position(list, id).is_some()
}

/// Restore list invariants on data read back from storage.
///
/// Drops duplicate ids (first occurrence wins) and truncates bounded lists to
/// their capacity. Returns the number of entries dropped.
pub fn normalize(kind: ListKind, list: &mut Vec<ListEntry>) -> usize {
    let before = list.len();
    let mut seen = HashSet::with_capacity(list.len());
    list.retain(|entry| seen.insert(entry.id.clone()));
    if let Some(capacity) = kind.capacity() {
        list.truncate(capacity);
    }
    before - list.len()
}

fn position(list: &[ListEntry], id: &ProductId) -> Option<usize> {
    list.iter().position(|entry| &entry.id == id)
}
