//! JSON and form bodies exchanged between the guest client and the storefront.
//!
//! Field names follow the storefront's public API (`camelCase`).

use serde::{Deserialize, Serialize};

use crate::types::{Country, CurrencyCode, ProductId};

/// Message returned when the sync endpoint is called without a session.
pub const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Message returned by the authorize-callback variant without guest data.
pub const NO_GUEST_WISHLIST: &str = "No guest wishlist provided";

/// Name of the storefront session cookie.
pub const SESSION_COOKIE_NAME: &str = "shelf_session";

/// `POST /api/wishlist/sync` request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    /// Raw guest wishlist ids. Absent and empty are equivalent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_wishlist: Option<Vec<String>>,
}

impl SyncRequest {
    /// Build a request from parsed ids.
    #[must_use]
    pub fn from_ids(ids: &[ProductId]) -> Self {
        Self {
            local_wishlist: Some(ids.iter().map(|id| id.as_str().to_owned()).collect()),
        }
    }
}

/// Successful sync response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Number of ids newly added to the server wishlist.
    pub count: usize,
    /// Size of the server wishlist after the merge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<usize>,
}

/// Error body for the JSON API (`401` and `500`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Form posted to the authorize-callback variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeWishlistForm {
    /// JSON-encoded array of product id strings.
    #[serde(default)]
    pub guest_wishlist: Option<String>,
}

/// Response of the authorize-callback variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizeWishlistResponse {
    pub success: bool,
    /// Number of ids newly added (success only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged: Option<usize>,
    /// Failure reason (failure only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AuthorizeWishlistResponse {
    #[must_use]
    pub const fn merged(count: usize) -> Self {
        Self {
            success: true,
            merged: Some(count),
            message: None,
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            merged: None,
            message: Some(message.into()),
        }
    }
}

/// `GET /api/session` response: the login flag observed by the sync driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub logged_in: bool,
}

/// Server wishlist as returned by the account API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistResponse {
    pub items: Vec<ProductId>,
    pub count: usize,
}

impl From<Vec<ProductId>> for WishlistResponse {
    fn from(items: Vec<ProductId>) -> Self {
        Self {
            count: items.len(),
            items,
        }
    }
}

/// `POST /api/wishlist/items` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItemRequest {
    pub product_id: String,
}

/// `GET /api/locale` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleResponse {
    pub country: Country,
    pub currency: CurrencyCode,
}
