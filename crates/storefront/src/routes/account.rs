//! Account route handlers.
//!
//! The post-login page posts the guest wishlist here as a form field holding
//! a JSON array. Unlike the JSON API this handler always answers with
//! `{ success, merged | message }` so the page script has one shape to read.

use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shelf_core::wire::{
    AuthorizeWishlistForm, AuthorizeWishlistResponse, NO_GUEST_WISHLIST, NOT_AUTHENTICATED,
};

use crate::middleware::OptionalShopifyCustomer;
use crate::services::wishlist::WishlistError;
use crate::state::AppState;

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(AuthorizeWishlistResponse::failure(message))).into_response()
}

/// Merge a guest wishlist posted by the post-login page.
///
/// # Route
///
/// `POST /account/authorize/wishlist`
#[tracing::instrument(skip_all)]
pub async fn authorize_wishlist(
    State(state): State<AppState>,
    OptionalShopifyCustomer(token): OptionalShopifyCustomer,
    Form(form): Form<AuthorizeWishlistForm>,
) -> Response {
    let Some(token) = token else {
        return failure(StatusCode::UNAUTHORIZED, NOT_AUTHENTICATED);
    };

    let Some(raw) = form.guest_wishlist.filter(|raw| !raw.trim().is_empty()) else {
        return Json(AuthorizeWishlistResponse::failure(NO_GUEST_WISHLIST)).into_response();
    };

    let guest: Vec<String> = match serde_json::from_str(&raw) {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed guest wishlist");
            return failure(
                StatusCode::BAD_REQUEST,
                format!("Invalid guest wishlist: {e}"),
            );
        }
    };

    match state.wishlist().sync_guest(&token.access_token, &guest).await {
        Ok(outcome) => Json(AuthorizeWishlistResponse::merged(outcome.added)).into_response(),
        Err(e) if e.is_unauthorized() => failure(StatusCode::UNAUTHORIZED, NOT_AUTHENTICATED),
        Err(e @ WishlistError::InvalidProductId(_)) => {
            failure(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            tracing::error!(error = %e, sentry_event_id = %event_id, "Guest wishlist merge failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
