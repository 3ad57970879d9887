//! Customer wishlist service.
//!
//! The account-side list is the source of truth once a customer signs in.
//! A guest list collected before sign-in is merged into it exactly once by
//! [`WishlistService::sync_guest`]; the caller clears its local copy only
//! after that succeeds.

mod store;

pub use store::*;

use std::sync::Arc;

use serde_json::{Value, json};
use shelf_core::{ProductId, merge_with_outcome, parse_product_ids};
use thiserror::Error;

use crate::services::analytics::Analytics;
use crate::shopify::ShopifyError;

/// Analytics event emitted after a guest list was merged.
pub const WISHLIST_SYNCED_EVENT: &str = "wishlist_synced";

/// Errors from wishlist operations.
#[derive(Debug, Error)]
pub enum WishlistError {
    /// Reading the stored list failed.
    #[error("Failed to read wishlist: {0}")]
    Fetch(#[source] ShopifyError),

    /// Writing the merged list failed.
    #[error("Failed to save wishlist: {0}")]
    Write(#[source] ShopifyError),

    /// A product id in the request was blank or too long.
    #[error("Invalid product id: {0}")]
    InvalidProductId(#[from] shelf_core::IdError),
}

impl WishlistError {
    /// Whether the account store rejected the access token.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        match self {
            Self::Fetch(e) | Self::Write(e) => e.is_unauthorized(),
            Self::InvalidProductId(_) => false,
        }
    }
}

/// Result of merging a guest list into the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Ids that were new to the account list.
    pub added: usize,
    /// Size of the account list afterwards. `None` when nothing was read.
    pub total: Option<usize>,
}

/// A stored value that could not be understood.
#[derive(Debug, Error)]
pub enum WishlistValueError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON array, found {0}")]
    NotAnArray(&'static str),
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse a stored wishlist value: a JSON array of product id strings.
///
/// Non-string elements and blank ids are skipped.
///
/// # Errors
///
/// Returns an error if the value is not JSON or not an array.
pub fn parse_wishlist_value(raw: &str) -> Result<Vec<ProductId>, WishlistValueError> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Array(items) = value else {
        return Err(WishlistValueError::NotAnArray(json_kind(&value)));
    };

    let strings: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
    let (ids, dropped) = parse_product_ids(&strings);
    let skipped = dropped + (items.len() - strings.len());
    if skipped > 0 {
        tracing::debug!(skipped, "Skipped unusable stored wishlist entries");
    }
    Ok(ids)
}

/// Read a stored wishlist value, treating anything unreadable as empty.
#[must_use]
pub fn read_wishlist_value(raw: Option<&str>) -> Vec<ProductId> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    match parse_wishlist_value(raw) {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed stored wishlist");
            Vec::new()
        }
    }
}

/// Wishlist operations for signed-in customers.
#[derive(Clone)]
pub struct WishlistService {
    store: Arc<dyn WishlistStore>,
    analytics: Analytics,
}

impl WishlistService {
    #[must_use]
    pub fn new(store: Arc<dyn WishlistStore>, analytics: Analytics) -> Self {
        Self { store, analytics }
    }

    /// Merge a guest wishlist into the account list.
    ///
    /// Blank ids are dropped. An empty guest list touches nothing. The merged
    /// list is written only when it gained ids.
    ///
    /// # Errors
    ///
    /// Returns an error if the account list cannot be read or written.
    #[tracing::instrument(skip(self, access_token, guest), fields(guest_len = guest.len()))]
    pub async fn sync_guest<S: AsRef<str>>(
        &self,
        access_token: &str,
        guest: &[S],
    ) -> Result<SyncOutcome, WishlistError> {
        let (local, dropped) = parse_product_ids(guest);
        if dropped > 0 {
            tracing::debug!(dropped, "Dropped blank guest wishlist ids");
        }

        if local.is_empty() {
            return Ok(SyncOutcome {
                added: 0,
                total: None,
            });
        }

        let stored = self
            .store
            .fetch(access_token)
            .await
            .map_err(WishlistError::Fetch)?;
        let server = read_wishlist_value(stored.raw.as_deref());

        let outcome = merge_with_outcome(&server, &local);
        let total = outcome.merged.len();

        if outcome.is_unchanged() {
            tracing::debug!(total, "Guest wishlist already present on account");
            return Ok(SyncOutcome {
                added: 0,
                total: Some(total),
            });
        }

        self.store
            .write(access_token, &stored.owner, &outcome.merged)
            .await
            .map_err(WishlistError::Write)?;

        tracing::info!(added = outcome.added, total, "Merged guest wishlist");
        self.analytics.record(
            WISHLIST_SYNCED_EVENT,
            &json!({ "added": outcome.added, "total": total }),
        );

        Ok(SyncOutcome {
            added: outcome.added,
            total: Some(total),
        })
    }

    /// The account list.
    ///
    /// # Errors
    ///
    /// Returns an error if the account list cannot be read.
    pub async fn items(&self, access_token: &str) -> Result<Vec<ProductId>, WishlistError> {
        let stored = self
            .store
            .fetch(access_token)
            .await
            .map_err(WishlistError::Fetch)?;

        let mut ids = read_wishlist_value(stored.raw.as_deref());
        let mut seen = std::collections::HashSet::new();
        ids.retain(|id| seen.insert(id.clone()));
        Ok(ids)
    }

    /// Add one product to the account list. Returns the resulting list.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is invalid or the list cannot be read or
    /// written.
    pub async fn add_item(
        &self,
        access_token: &str,
        product_id: &str,
    ) -> Result<Vec<ProductId>, WishlistError> {
        let id = ProductId::parse(product_id)?;
        let stored = self
            .store
            .fetch(access_token)
            .await
            .map_err(WishlistError::Fetch)?;
        let server = read_wishlist_value(stored.raw.as_deref());

        let outcome = merge_with_outcome(&server, std::slice::from_ref(&id));
        if !outcome.is_unchanged() {
            self.store
                .write(access_token, &stored.owner, &outcome.merged)
                .await
                .map_err(WishlistError::Write)?;
        }
        Ok(outcome.merged)
    }

    /// Remove one product from the account list. Returns the resulting list.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is invalid or the list cannot be read or
    /// written.
    pub async fn remove_item(
        &self,
        access_token: &str,
        product_id: &str,
    ) -> Result<Vec<ProductId>, WishlistError> {
        let id = ProductId::parse(product_id)?;
        let stored = self
            .store
            .fetch(access_token)
            .await
            .map_err(WishlistError::Fetch)?;
        let server = read_wishlist_value(stored.raw.as_deref());

        // Duplicates in the stored value alone do not warrant a write.
        let remaining = merge_with_outcome(&server, &[]).merged;
        let kept: Vec<ProductId> = remaining.iter().filter(|p| **p != id).cloned().collect();

        if kept.len() != remaining.len() {
            self.store
                .write(access_token, &stored.owner, &kept)
                .await
                .map_err(WishlistError::Write)?;
        }
        Ok(kept)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shelf_core::CustomerId;

    use super::*;

    const TOKEN: &str = "customer-token";

    fn ids(raw: &[&str]) -> Vec<ProductId> {
        raw.iter().map(|s| ProductId::parse(s).unwrap()).collect()
    }

    fn service_with(raw: Option<&str>) -> (WishlistService, Arc<MemoryWishlistStore>) {
        let store = Arc::new(MemoryWishlistStore::new());
        store.insert_account(
            TOKEN,
            CustomerId::parse("gid://shopify/Customer/7").unwrap(),
            raw,
        );
        let service = WishlistService::new(store.clone(), Analytics::default());
        (service, store)
    }

    #[test]
    fn test_parse_wishlist_value() {
        assert_eq!(
            parse_wishlist_value(r#"["a", "b"]"#).unwrap(),
            ids(&["a", "b"])
        );
        assert_eq!(
            parse_wishlist_value(r#"["a", 3, null, " ", "b"]"#).unwrap(),
            ids(&["a", "b"])
        );
        assert!(matches!(
            parse_wishlist_value(r#"{"a": 1}"#),
            Err(WishlistValueError::NotAnArray("object"))
        ));
        assert!(matches!(
            parse_wishlist_value("not json"),
            Err(WishlistValueError::Json(_))
        ));
    }

    #[test]
    fn test_read_wishlist_value_collapses_failures() {
        assert!(read_wishlist_value(None).is_empty());
        assert!(read_wishlist_value(Some("{broken")).is_empty());
        assert!(read_wishlist_value(Some("\"a\"")).is_empty());
        assert_eq!(read_wishlist_value(Some(r#"["x"]"#)), ids(&["x"]));
    }

    #[tokio::test]
    async fn test_sync_merges_into_account() {
        let (service, store) = service_with(Some(r#"["a", "b"]"#));

        let outcome = service.sync_guest(TOKEN, &["b", "c"]).await.unwrap();

        assert_eq!(
            outcome,
            SyncOutcome {
                added: 1,
                total: Some(3)
            }
        );
        assert_eq!(store.stored_ids(TOKEN), ids(&["a", "b", "c"]));
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn test_sync_into_empty_account() {
        let (service, store) = service_with(None);

        let outcome = service.sync_guest(TOKEN, &["x", "y"]).await.unwrap();

        assert_eq!(outcome.added, 2);
        assert_eq!(store.stored_ids(TOKEN), ids(&["x", "y"]));
    }

    #[tokio::test]
    async fn test_sync_empty_guest_list_touches_nothing() {
        let (service, store) = service_with(Some(r#"["a"]"#));

        let outcome = service.sync_guest::<&str>(TOKEN, &[]).await.unwrap();

        assert_eq!(outcome.added, 0);
        assert_eq!(store.reads(), 0);
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_sync_blank_ids_only_touches_nothing() {
        let (service, store) = service_with(Some(r#"["a"]"#));

        let outcome = service.sync_guest(TOKEN, &["", "  "]).await.unwrap();

        assert_eq!(outcome.added, 0);
        assert_eq!(store.reads(), 0);
    }

    #[tokio::test]
    async fn test_sync_subset_skips_write() {
        let (service, store) = service_with(Some(r#"["a", "b"]"#));

        let outcome = service.sync_guest(TOKEN, &["a"]).await.unwrap();

        assert_eq!(outcome.added, 0);
        assert_eq!(outcome.total, Some(2));
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_sync_repeated_is_idempotent() {
        let (service, store) = service_with(Some(r#"["a"]"#));

        service.sync_guest(TOKEN, &["b"]).await.unwrap();
        let second = service.sync_guest(TOKEN, &["b"]).await.unwrap();

        assert_eq!(second.added, 0);
        assert_eq!(store.stored_ids(TOKEN), ids(&["a", "b"]));
    }

    #[tokio::test]
    async fn test_sync_malformed_stored_value_treated_as_empty() {
        let (service, store) = service_with(Some("{not a list"));

        let outcome = service.sync_guest(TOKEN, &["a"]).await.unwrap();

        assert_eq!(outcome.added, 1);
        assert_eq!(store.stored_ids(TOKEN), ids(&["a"]));
    }

    #[tokio::test]
    async fn test_sync_read_failure() {
        let (service, store) = service_with(Some("[]"));
        store.set_fail_reads(true);

        let err = service.sync_guest(TOKEN, &["a"]).await.unwrap_err();

        assert!(matches!(err, WishlistError::Fetch(_)));
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_sync_write_failure_leaves_account_unchanged() {
        let (service, store) = service_with(Some(r#"["a"]"#));
        store.set_fail_writes(true);

        let err = service.sync_guest(TOKEN, &["b"]).await.unwrap_err();

        assert!(matches!(err, WishlistError::Write(_)));
        assert_eq!(store.stored_ids(TOKEN), ids(&["a"]));
    }

    #[tokio::test]
    async fn test_sync_unknown_token_is_unauthorized() {
        let (service, _store) = service_with(None);

        let err = service.sync_guest("other", &["a"]).await.unwrap_err();

        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_add_and_remove_items() {
        let (service, store) = service_with(Some(r#"["a"]"#));

        assert_eq!(service.add_item(TOKEN, "b").await.unwrap(), ids(&["a", "b"]));
        assert_eq!(service.add_item(TOKEN, "b").await.unwrap(), ids(&["a", "b"]));
        assert_eq!(store.writes(), 1);

        assert_eq!(service.remove_item(TOKEN, "a").await.unwrap(), ids(&["b"]));
        assert_eq!(service.remove_item(TOKEN, "zzz").await.unwrap(), ids(&["b"]));
        assert_eq!(store.writes(), 2);
        assert_eq!(service.items(TOKEN).await.unwrap(), ids(&["b"]));
    }

    #[tokio::test]
    async fn test_remove_absent_item_with_duplicates_stored_does_not_write() {
        let (service, store) = service_with(Some(r#"["a","b","a"]"#));

        assert_eq!(service.remove_item(TOKEN, "zzz").await.unwrap(), ids(&["a", "b"]));
        assert_eq!(store.writes(), 0);

        assert_eq!(service.remove_item(TOKEN, "a").await.unwrap(), ids(&["b"]));
        assert_eq!(store.writes(), 1);
        assert_eq!(store.stored_ids(TOKEN), ids(&["b"]));
    }

    #[tokio::test]
    async fn test_add_blank_item_rejected() {
        let (service, store) = service_with(None);

        let err = service.add_item(TOKEN, "   ").await.unwrap_err();

        assert!(matches!(err, WishlistError::InvalidProductId(_)));
        assert_eq!(store.reads(), 0);
    }
}
