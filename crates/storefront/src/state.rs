//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::services::analytics::Analytics;
use crate::services::wishlist::{MetafieldWishlistStore, WishlistService, WishlistStore};
use crate::shopify::CustomerClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the session pool, the Shopify client and the
/// wishlist service.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    customer: CustomerClient,
    wishlist: WishlistService,
}

impl AppState {
    /// Create the production state: wishlists live in a customer metafield
    /// and analytics go to the log and Sentry.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let customer = CustomerClient::new(&config.shopify);
        let store = Arc::new(MetafieldWishlistStore::new(
            customer.clone(),
            config.wishlist.clone(),
        ));
        Self::with_store(config, pool, store, Analytics::with_defaults())
    }

    /// Create a state over a custom wishlist store.
    #[must_use]
    pub fn with_store(
        config: StorefrontConfig,
        pool: PgPool,
        store: Arc<dyn WishlistStore>,
        analytics: Analytics,
    ) -> Self {
        let customer = CustomerClient::new(&config.shopify);
        let wishlist = WishlistService::new(store, analytics);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                customer,
                wishlist,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the Shopify Customer Account API client.
    #[must_use]
    pub fn customer(&self) -> &CustomerClient {
        &self.inner.customer
    }

    /// Get a reference to the wishlist service.
    #[must_use]
    pub fn wishlist(&self) -> &WishlistService {
        &self.inner.wishlist
    }
}
