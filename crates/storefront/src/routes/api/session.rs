//! Login status for the sync driver.

use axum::Json;
use shelf_core::wire::SessionStatus;

use crate::middleware::OptionalShopifyCustomer;

/// Whether the request carries a signed-in customer.
///
/// # Route
///
/// `GET /api/session`
pub async fn status(OptionalShopifyCustomer(token): OptionalShopifyCustomer) -> Json<SessionStatus> {
    Json(SessionStatus {
        logged_in: token.is_some(),
    })
}
