//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                    - Liveness check
//! GET    /health/ready              - Readiness check (session database)
//!
//! # Shopify Customer OAuth
//! GET    /auth/shopify/login        - Redirect to Shopify OAuth
//! GET    /auth/shopify/callback     - Handle OAuth callback
//! POST   /auth/shopify/logout       - Logout from Shopify
//!
//! # JSON API
//! GET    /api/session               - Login status
//! GET    /api/locale                - Detected country and currency
//! POST   /api/wishlist/sync         - Merge guest wishlist into account
//! GET    /api/wishlist              - Account wishlist
//! POST   /api/wishlist/items        - Add product to account wishlist
//! DELETE /api/wishlist/items/{id}   - Remove product from account wishlist
//!
//! # Account
//! POST   /account/authorize/wishlist - Merge guest wishlist (form post)
//! ```

pub mod account;
pub mod api;
pub mod shopify_auth;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
};

use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Create the Shopify OAuth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/shopify/login", get(shopify_auth::login))
        .route("/shopify/callback", get(shopify_auth::callback))
        .route("/shopify/logout", post(shopify_auth::logout))
        .layer(auth_rate_limiter())
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/session", get(api::session::status))
        .route("/locale", get(api::locale::show))
        .route("/wishlist", get(api::wishlist::show))
        .route("/wishlist/sync", post(api::wishlist::sync))
        .route("/wishlist/items", post(api::wishlist::add_item))
        .route("/wishlist/items/{id}", delete(api::wishlist::remove_item))
        .layer(api_rate_limiter())
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/authorize/wishlist", post(account::authorize_wishlist))
        .layer(api_rate_limiter())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/auth", auth_routes())
        .nest("/api", api_routes())
        .nest("/account", account_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies session database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
