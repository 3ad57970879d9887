//! Market detection endpoint.

use axum::Json;
use shelf_core::wire::LocaleResponse;

use crate::middleware::DetectedLocale;

/// The shopper's country and the currency it is priced in.
///
/// # Route
///
/// `GET /api/locale`
pub async fn show(locale: DetectedLocale) -> Json<LocaleResponse> {
    tracing::debug!(country = %locale.country, source = ?locale.source, "Detected locale");
    Json(LocaleResponse {
        country: locale.country,
        currency: locale.currency(),
    })
}
