//! Entries held by the guest-side product lists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product saved in one of the guest lists (wishlist, recently viewed,
/// comparison).
///
/// Display fields are denormalized so the list renders without fetching the
/// product again. Identity is `id` alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntry {
    /// Product identifier.
    pub id: ProductId,
    /// When the entry was added (or last viewed, for recently viewed).
    pub added_at: DateTime<Utc>,
    /// Product title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Featured image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Price at the time the entry was cached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
}

impl ListEntry {
    /// Create an entry stamped with the current time and no display data.
    #[must_use]
    pub fn new(id: ProductId) -> Self {
        Self::at(id, Utc::now())
    }

    /// Create an entry with an explicit timestamp.
    #[must_use]
    pub const fn at(id: ProductId, added_at: DateTime<Utc>) -> Self {
        Self {
            id,
            added_at,
            title: None,
            image: None,
            price: None,
        }
    }

    /// Attach a title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attach an image URL.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Attach a cached price.
    #[must_use]
    pub fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }
}
