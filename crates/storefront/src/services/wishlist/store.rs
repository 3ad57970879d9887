//! Where a customer's wishlist lives.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use shelf_core::{CustomerId, ProductId};

use crate::config::WishlistConfig;
use crate::shopify::{CustomerClient, MetafieldsSetInput, ShopifyError};

/// Metafield type used for the stored list.
const METAFIELD_TYPE: &str = "json";

/// Raw stored wishlist for one customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredWishlist {
    /// Customer that owns the list.
    pub owner: CustomerId,
    /// Raw stored value, `None` when nothing has been stored yet.
    pub raw: Option<String>,
}

/// Account-side wishlist storage.
///
/// Implementations read and replace the whole list; there is no
/// compare-and-swap, so two concurrent writers can overwrite each other.
#[async_trait]
pub trait WishlistStore: Send + Sync {
    /// Read the raw stored value for the customer behind `access_token`.
    async fn fetch(&self, access_token: &str) -> Result<StoredWishlist, ShopifyError>;

    /// Replace the stored list for `owner`.
    async fn write(
        &self,
        access_token: &str,
        owner: &CustomerId,
        ids: &[ProductId],
    ) -> Result<(), ShopifyError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Shopify metafield
// ─────────────────────────────────────────────────────────────────────────────

/// Stores the wishlist as a JSON customer metafield in Shopify.
#[derive(Clone)]
pub struct MetafieldWishlistStore {
    client: CustomerClient,
    config: WishlistConfig,
}

impl MetafieldWishlistStore {
    #[must_use]
    pub const fn new(client: CustomerClient, config: WishlistConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl WishlistStore for MetafieldWishlistStore {
    async fn fetch(&self, access_token: &str) -> Result<StoredWishlist, ShopifyError> {
        let field = self
            .client
            .get_metafield(access_token, &self.config.namespace, &self.config.key)
            .await?;

        let owner = CustomerId::parse(&field.customer_id)
            .map_err(|e| ShopifyError::InvalidResponse(format!("customer id: {e}")))?;

        Ok(StoredWishlist {
            owner,
            raw: field.value,
        })
    }

    async fn write(
        &self,
        access_token: &str,
        owner: &CustomerId,
        ids: &[ProductId],
    ) -> Result<(), ShopifyError> {
        let input = MetafieldsSetInput {
            owner_id: owner.as_str().to_string(),
            namespace: self.config.namespace.clone(),
            key: self.config.key.clone(),
            kind: METAFIELD_TYPE.to_string(),
            value: serde_json::to_string(ids)?,
        };

        self.client.set_metafield(access_token, input).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory
// ─────────────────────────────────────────────────────────────────────────────

/// In-process store keyed by access token.
///
/// Used by tests and local development. Counts reads and writes and can be
/// told to fail either operation.
#[derive(Debug, Default)]
pub struct MemoryWishlistStore {
    accounts: Mutex<HashMap<String, StoredWishlist>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryWishlistStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account with an optional raw stored value.
    pub fn insert_account(&self, access_token: &str, owner: CustomerId, raw: Option<&str>) {
        self.lock().insert(
            access_token.to_string(),
            StoredWishlist {
                owner,
                raw: raw.map(str::to_string),
            },
        );
    }

    /// Raw stored value for an account.
    #[must_use]
    pub fn raw_value(&self, access_token: &str) -> Option<String> {
        self.lock()
            .get(access_token)
            .and_then(|stored| stored.raw.clone())
    }

    /// Stored list for an account, parsed.
    #[must_use]
    pub fn stored_ids(&self, access_token: &str) -> Vec<ProductId> {
        super::read_wishlist_value(self.raw_value(access_token).as_deref())
    }

    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredWishlist>> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.accounts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn unavailable() -> ShopifyError {
    ShopifyError::Status {
        status: 503,
        body: "store unavailable".to_string(),
    }
}

fn unauthorized() -> ShopifyError {
    ShopifyError::Status {
        status: 401,
        body: "unknown access token".to_string(),
    }
}

#[async_trait]
impl WishlistStore for MemoryWishlistStore {
    async fn fetch(&self, access_token: &str) -> Result<StoredWishlist, ShopifyError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        self.lock()
            .get(access_token)
            .cloned()
            .ok_or_else(unauthorized)
    }

    async fn write(
        &self,
        access_token: &str,
        owner: &CustomerId,
        ids: &[ProductId],
    ) -> Result<(), ShopifyError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        let value = serde_json::to_string(ids)?;
        let mut accounts = self.lock();
        let stored = accounts.get_mut(access_token).ok_or_else(unauthorized)?;
        if &stored.owner != owner {
            return Err(ShopifyError::UserError("owner mismatch".to_string()));
        }
        stored.raw = Some(value);
        Ok(())
    }
}
