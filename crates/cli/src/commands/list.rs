//! Guest list commands.
//!
//! ```bash
//! shelf wishlist add gid://shopify/Product/1 --title "Water bottle"
//! shelf recent list
//! shelf compare clear
//! ```

use std::path::Path;
use std::sync::Arc;

use shelf_core::{IdError, InsertOutcome, ListEntry, ListKind, ProductId};
use thiserror::Error;

use crate::ListAction;
use shelf_cli::storage::FileStorage;
use shelf_cli::store::LocalListStore;

#[derive(Debug, Error)]
pub enum ListCommandError {
    #[error("invalid product id: {0}")]
    InvalidProductId(#[from] IdError),

    #[error("the {list} list is full ({capacity} products)")]
    Full { list: &'static str, capacity: usize },
}

/// Run one list action against the profile directory.
///
/// # Errors
///
/// Returns an error for a malformed product id, or when adding to a full
/// comparison list.
pub fn run(profile: &Path, kind: ListKind, action: ListAction) -> Result<(), ListCommandError> {
    let store = LocalListStore::new(Arc::new(FileStorage::new(profile)), kind);

    match action {
        ListAction::Add { id, title, image } => {
            let mut entry = ListEntry::new(ProductId::parse(&id)?);
            if let Some(title) = title {
                entry = entry.with_title(title);
            }
            if let Some(image) = image {
                entry = entry.with_image(image);
            }

            match store.add(entry) {
                InsertOutcome::Rejected { capacity } => {
                    return Err(ListCommandError::Full {
                        list: kind.label(),
                        capacity,
                    });
                }
                InsertOutcome::Added {
                    evicted: Some(evicted),
                } => {
                    tracing::info!(id = %id, evicted = %evicted.id, "Added to {}", kind.label());
                }
                InsertOutcome::Added { evicted: None } | InsertOutcome::MovedToFront => {
                    tracing::info!(id = %id, "Added to {}", kind.label());
                }
                InsertOutcome::AlreadyPresent => {
                    tracing::info!(id = %id, "Already in {}", kind.label());
                }
            }
        }
        ListAction::Remove { id } => {
            let id = ProductId::parse(&id)?;
            if store.remove(&id) {
                tracing::info!(id = %id, "Removed from {}", kind.label());
            } else {
                tracing::info!(id = %id, "Not in {}", kind.label());
            }
        }
        ListAction::Toggle { id } => {
            let id = ProductId::parse(&id)?;
            if store.remove(&id) {
                tracing::info!(id = %id, "Removed from {}", kind.label());
                return Ok(());
            }
            let outcome = store.add(ListEntry::new(id.clone()));
            if let InsertOutcome::Rejected { capacity } = outcome {
                return Err(ListCommandError::Full {
                    list: kind.label(),
                    capacity,
                });
            }
            tracing::info!(id = %id, "Added to {}", kind.label());
        }
        ListAction::List => print_entries(kind, &store.get()),
        ListAction::Clear => {
            store.clear();
            tracing::info!("Cleared {}", kind.label());
        }
    }

    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_entries(kind: ListKind, entries: &[ListEntry]) {
    if entries.is_empty() {
        println!("Your {} is empty.", kind.label());
        return;
    }

    for entry in entries {
        match &entry.title {
            Some(title) => println!("{}  {title}", entry.id),
            None => println!("{}", entry.id),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn toggle(profile: &Path, kind: ListKind, id: &str) -> Result<(), ListCommandError> {
        run(profile, kind, ListAction::Toggle { id: id.to_string() })
    }

    fn stored(profile: &Path, kind: ListKind) -> Vec<ProductId> {
        LocalListStore::new(Arc::new(FileStorage::new(profile)), kind).ids()
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let dir = tempfile::tempdir().unwrap();

        toggle(dir.path(), ListKind::Wishlist, "p1").unwrap();
        assert_eq!(stored(dir.path(), ListKind::Wishlist).len(), 1);

        toggle(dir.path(), ListKind::Wishlist, "p1").unwrap();
        assert!(stored(dir.path(), ListKind::Wishlist).is_empty());
    }

    #[test]
    fn test_toggle_on_full_comparison_fails() {
        let dir = tempfile::tempdir().unwrap();
        for id in ["a", "b", "c", "d"] {
            toggle(dir.path(), ListKind::Comparison, id).unwrap();
        }

        let err = toggle(dir.path(), ListKind::Comparison, "e").unwrap_err();
        assert!(matches!(err, ListCommandError::Full { capacity: 4, .. }));
        assert_eq!(stored(dir.path(), ListKind::Comparison).len(), 4);

        // Toggling a present id still removes it.
        toggle(dir.path(), ListKind::Comparison, "a").unwrap();
        assert_eq!(stored(dir.path(), ListKind::Comparison).len(), 3);
    }

    #[test]
    fn test_invalid_id_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = toggle(dir.path(), ListKind::Wishlist, "   ").unwrap_err();
        assert!(matches!(err, ListCommandError::InvalidProductId(_)));
    }
}
