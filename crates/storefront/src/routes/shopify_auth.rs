//! Shopify Customer Account OAuth route handlers.
//!
//! - Login: redirects to Shopify's authorization page
//! - Callback: exchanges the code for tokens and stores them in the session
//! - Logout: clears the token and redirects to Shopify's logout
//!
//! A successful callback is the false-to-true login edge the wishlist sync
//! driver watches for through `GET /api/session`.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rand::{Rng, distr::Alphanumeric};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::clear_sentry_user;
use crate::middleware::{clear_shopify_customer_token, set_shopify_customer_token};
use crate::models::session_keys;
use crate::shopify::CustomerAccessToken;
use crate::state::AppState;

/// Length of the CSRF state and `OpenID` nonce.
const OAUTH_TOKEN_LEN: usize = 32;

/// Query parameters from Shopify OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
    /// Error description.
    pub error_description: Option<String>,
}

/// Generate a random alphanumeric string from the thread-local CSPRNG.
fn generate_random_string(length: usize) -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

fn callback_uri(state: &AppState) -> String {
    format!("{}/auth/shopify/callback", state.config().base_url)
}

fn login_failed(reason: &str) -> Response {
    Redirect::to(&format!("/?login_error={reason}")).into_response()
}

/// Initiate Shopify Customer Account OAuth login.
///
/// # Route
///
/// `GET /auth/shopify/login`
pub async fn login(State(state): State<AppState>, session: Session) -> Response {
    let oauth_state = generate_random_string(OAUTH_TOKEN_LEN);
    let nonce = generate_random_string(OAUTH_TOKEN_LEN);

    for (key, value) in [
        (session_keys::SHOPIFY_OAUTH_STATE, &oauth_state),
        (session_keys::SHOPIFY_OAUTH_NONCE, &nonce),
    ] {
        if let Err(e) = session.insert(key, value).await {
            tracing::error!(error = %e, key, "Failed to store OAuth parameter in session");
            return login_failed("session");
        }
    }

    let auth_url = state
        .customer()
        .authorization_url(&callback_uri(&state), &oauth_state, &nonce);

    Redirect::to(&auth_url).into_response()
}

/// Handle Shopify OAuth callback.
///
/// # Route
///
/// `GET /auth/shopify/callback`
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Response {
    if let Some(error) = query.error {
        let description = query.error_description.unwrap_or_default();
        tracing::warn!(error = %error, description = %description, "Shopify OAuth error");
        return login_failed("shopify_denied");
    }

    let Some(code) = query.code else {
        tracing::warn!("Shopify OAuth callback missing code");
        return login_failed("missing_code");
    };

    let Some(returned_state) = query.state else {
        tracing::warn!("Shopify OAuth callback missing state");
        return login_failed("missing_state");
    };

    let stored_state: Option<String> = session
        .remove(session_keys::SHOPIFY_OAUTH_STATE)
        .await
        .ok()
        .flatten();
    let _ = session
        .remove::<String>(session_keys::SHOPIFY_OAUTH_NONCE)
        .await;

    // One-time use: removed above whether or not it matches.
    if stored_state.as_ref() != Some(&returned_state) {
        tracing::warn!("Shopify OAuth state mismatch");
        return login_failed("invalid_state");
    }

    let token = match state
        .customer()
        .exchange_code(&code, &callback_uri(&state))
        .await
    {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "Failed to exchange Shopify OAuth code");
            return login_failed("token_exchange");
        }
    };

    // New session id after privilege change.
    if let Err(e) = session.cycle_id().await {
        tracing::error!(error = %e, "Failed to cycle session id");
        return login_failed("session");
    }

    if let Err(e) = set_shopify_customer_token(&session, &token).await {
        tracing::error!(error = %e, "Failed to store Shopify customer token");
        return login_failed("session");
    }

    tracing::info!("Shopify customer authenticated");
    Redirect::to("/").into_response()
}

/// Logout from Shopify Customer Account.
///
/// # Route
///
/// `POST /auth/shopify/logout`
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    let token: Option<CustomerAccessToken> = session
        .get(session_keys::SHOPIFY_CUSTOMER_TOKEN)
        .await
        .ok()
        .flatten();

    if let Err(e) = clear_shopify_customer_token(&session).await {
        tracing::warn!(error = %e, "Failed to clear Shopify customer token");
    }
    clear_sentry_user();

    if let Some(id_token) = token.and_then(|t| t.id_token) {
        let post_logout_uri = format!("{}/", state.config().base_url);
        let logout_url = state.customer().logout_url(&id_token, &post_logout_uri);
        return Redirect::to(&logout_url).into_response();
    }

    Redirect::to("/").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_string_shape() {
        let a = generate_random_string(OAUTH_TOKEN_LEN);
        let b = generate_random_string(OAUTH_TOKEN_LEN);
        assert_eq!(a.len(), OAUTH_TOKEN_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}
