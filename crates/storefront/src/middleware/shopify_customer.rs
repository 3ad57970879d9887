//! Shopify Customer authentication extractors.
//!
//! The customer's access token is kept in the session after the OAuth
//! callback. Its presence is what "logged in" means for the wishlist API.

use axum::{
    Json,
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use shelf_core::wire::{ErrorBody, NOT_AUTHENTICATED};
use tower_sessions::Session;

use crate::models::session_keys;
use crate::shopify::CustomerAccessToken;

/// Extractor that requires a signed-in Shopify customer.
///
/// API requests (`/api/...`) are rejected with a JSON 401; page requests are
/// redirected to the Shopify login.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireShopifyCustomer(token): RequireShopifyCustomer,
/// ) -> impl IntoResponse {
///     // token.access_token authorizes Customer Account API calls
/// }
/// ```
pub struct RequireShopifyCustomer(pub CustomerAccessToken);

/// Rejection for [`RequireShopifyCustomer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopifyCustomerRejection {
    /// Redirect to Shopify login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for ShopifyCustomerRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/shopify/login").into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorBody::new(NOT_AUTHENTICATED)),
            )
                .into_response(),
        }
    }
}

/// Read the stored token, ignoring expired ones.
async fn current_token(session: &Session) -> Option<CustomerAccessToken> {
    let token: CustomerAccessToken = session
        .get(session_keys::SHOPIFY_CUSTOMER_TOKEN)
        .await
        .ok()
        .flatten()?;

    if token.is_expired() {
        tracing::debug!("Stored customer token has expired");
        return None;
    }

    Some(token)
}

impl<S> FromRequestParts<S> for RequireShopifyCustomer
where
    S: Send + Sync,
{
    type Rejection = ShopifyCustomerRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Nested routers strip their prefix from `parts.uri`
        let is_api = parts
            .extensions
            .get::<OriginalUri>()
            .map_or(parts.uri.path(), |original| original.0.path())
            .starts_with("/api/");
        let rejection = if is_api {
            ShopifyCustomerRejection::Unauthorized
        } else {
            ShopifyCustomerRejection::RedirectToLogin
        };

        // Set by SessionManagerLayer
        let session = parts.extensions.get::<Session>().ok_or(rejection)?;

        current_token(session).await.map(Self).ok_or(rejection)
    }
}

/// Extractor that optionally gets the Shopify customer token.
///
/// Never rejects; `None` means a guest.
pub struct OptionalShopifyCustomer(pub Option<CustomerAccessToken>);

impl<S> FromRequestParts<S> for OptionalShopifyCustomer
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = match parts.extensions.get::<Session>() {
            Some(session) => current_token(session).await,
            None => None,
        };

        Ok(Self(token))
    }
}

/// Store the Shopify customer token in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_shopify_customer_token(
    session: &Session,
    token: &CustomerAccessToken,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::SHOPIFY_CUSTOMER_TOKEN, token)
        .await
}

/// Remove the Shopify customer token from the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_shopify_customer_token(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CustomerAccessToken>(session_keys::SHOPIFY_CUSTOMER_TOKEN)
        .await?;
    Ok(())
}
