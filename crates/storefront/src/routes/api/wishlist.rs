//! Wishlist JSON API.
//!
//! All handlers require a signed-in customer. An unauthenticated request is
//! rejected before the account store is touched.

use axum::{
    Json,
    extract::{Path, State},
};
use shelf_core::wire::{SyncRequest, SyncResponse, WishlistItemRequest, WishlistResponse};

use super::ApiJson;
use crate::error::Result;
use crate::middleware::RequireShopifyCustomer;
use crate::state::AppState;

/// Merge the guest wishlist into the customer's account list.
///
/// # Route
///
/// `POST /api/wishlist/sync`
#[tracing::instrument(skip_all)]
pub async fn sync(
    State(state): State<AppState>,
    RequireShopifyCustomer(token): RequireShopifyCustomer,
    ApiJson(request): ApiJson<SyncRequest>,
) -> Result<Json<SyncResponse>> {
    let guest = request.local_wishlist.unwrap_or_default();

    let outcome = state
        .wishlist()
        .sync_guest(&token.access_token, &guest)
        .await?;

    let message = match (outcome.added, outcome.total) {
        (_, None) => "No items to sync".to_string(),
        (0, Some(_)) => "Wishlist already up to date".to_string(),
        (1, Some(_)) => "Added 1 item to your wishlist".to_string(),
        (n, Some(_)) => format!("Added {n} items to your wishlist"),
    };

    Ok(Json(SyncResponse {
        success: true,
        message: Some(message),
        count: outcome.added,
        total_items: outcome.total,
    }))
}

/// The customer's account wishlist.
///
/// # Route
///
/// `GET /api/wishlist`
#[tracing::instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireShopifyCustomer(token): RequireShopifyCustomer,
) -> Result<Json<WishlistResponse>> {
    let items = state.wishlist().items(&token.access_token).await?;
    Ok(Json(items.into()))
}

/// Add a product to the account wishlist.
///
/// # Route
///
/// `POST /api/wishlist/items`
#[tracing::instrument(skip_all, fields(product_id = %request.product_id))]
pub async fn add_item(
    State(state): State<AppState>,
    RequireShopifyCustomer(token): RequireShopifyCustomer,
    ApiJson(request): ApiJson<WishlistItemRequest>,
) -> Result<Json<WishlistResponse>> {
    let items = state
        .wishlist()
        .add_item(&token.access_token, &request.product_id)
        .await?;
    Ok(Json(items.into()))
}

/// Remove a product from the account wishlist.
///
/// # Route
///
/// `DELETE /api/wishlist/items/{id}`
#[tracing::instrument(skip_all, fields(product_id = %id))]
pub async fn remove_item(
    State(state): State<AppState>,
    RequireShopifyCustomer(token): RequireShopifyCustomer,
    Path(id): Path<String>,
) -> Result<Json<WishlistResponse>> {
    let items = state
        .wishlist()
        .remove_item(&token.access_token, &id)
        .await?;
    Ok(Json(items.into()))
}
