//! Unified error handling with Sentry integration.
//!
//! JSON handlers return `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before the response is built, and every error renders
//! as `{ "error": "..." }`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shelf_core::wire::{ErrorBody, NOT_AUTHENTICATED};
use thiserror::Error;

use crate::services::wishlist::WishlistError;
use crate::shopify::ShopifyError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Wishlist operation failed.
    #[error(transparent)]
    Wishlist(#[from] WishlistError),

    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Customer is not signed in.
    #[error("Not authenticated")]
    Unauthorized,

    /// The JSON request body was missing, malformed, or of the wrong shape.
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Wishlist(err) if err.is_unauthorized() => StatusCode::UNAUTHORIZED,
            Self::Wishlist(WishlistError::InvalidProductId(_)) => StatusCode::BAD_REQUEST,
            Self::Wishlist(_) | Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Shopify(_) => StatusCode::BAD_GATEWAY,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::InvalidBody(rejection) => rejection.status(),
        }
    }

    /// Message safe to show the client.
    ///
    /// Wishlist failures carry their reason so the client can report why its
    /// local list was kept.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Unauthorized => NOT_AUTHENTICATED.to_string(),
            Self::Wishlist(err) if err.is_unauthorized() => NOT_AUTHENTICATED.to_string(),
            Self::Wishlist(err) => err.to_string(),
            Self::Session(_) => "Internal server error".to_string(),
            Self::Shopify(_) => "External service error".to_string(),
            Self::InvalidBody(rejection) => rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, Json(ErrorBody::new(self.public_message()))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the customer.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("wishlist", "Guest wishlist merged", Some(&[("added", "2")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::Shopify(ShopifyError::OAuth("state mismatch".to_string()));
        assert_eq!(err.to_string(), "Shopify error: OAuth error: state mismatch");
        assert_eq!(AppError::Unauthorized.to_string(), "Not authenticated");
    }

    #[tokio::test]
    async fn test_unauthorized_body() {
        let (status, body) = body_of(AppError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, serde_json::json!({ "error": "Not authenticated" }));
    }

    #[tokio::test]
    async fn test_wishlist_failure_is_descriptive() {
        let err = AppError::Wishlist(WishlistError::Write(ShopifyError::UserError(
            "Value is invalid".to_string(),
        )));
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"],
            "Failed to save wishlist: User error: Value is invalid"
        );
    }

    #[tokio::test]
    async fn test_rejected_token_maps_to_unauthorized() {
        let err = AppError::Wishlist(WishlistError::Fetch(ShopifyError::Status {
            status: 401,
            body: String::new(),
        }));
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Not authenticated");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::Wishlist(WishlistError::InvalidProductId(shelf_core::IdError::Empty))
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Wishlist(WishlistError::Write(ShopifyError::UserError(
                "x".to_string()
            )))
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Shopify(ShopifyError::OAuth("x".to_string())).status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
