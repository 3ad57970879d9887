//! Integration tests for login status, market detection and health checks.

#![allow(clippy::unwrap_used)]

use axum::http::{HeaderValue, Method, StatusCode, header};
use serde_json::json;
use shelf_integration_tests::{TestStorefront, request};

// ============================================================================
// Session
// ============================================================================

#[tokio::test]
async fn test_session_status_follows_login() {
    let app = TestStorefront::new();

    let resp = app.get("/api/session", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, json!({ "loggedIn": false }));

    let cookie = app.login("tok-1", "gid://shopify/Customer/1").await;
    let resp = app.get("/api/session", Some(&cookie)).await;
    assert_eq!(resp.body, json!({ "loggedIn": true }));

    app.post_json("/test/logout", Some(&cookie), &json!({})).await;
    let resp = app.get("/api/session", Some(&cookie)).await;
    assert_eq!(resp.body, json!({ "loggedIn": false }));
}

#[tokio::test]
async fn test_unknown_session_cookie_is_logged_out() {
    let app = TestStorefront::new();

    let resp = app.get("/api/session", Some("not-a-session")).await;

    assert_eq!(resp.body, json!({ "loggedIn": false }));
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = TestStorefront::new();

    let mut req = request(Method::GET, "/api/session", None, None);
    req.headers_mut()
        .insert("x-request-id", HeaderValue::from_static("upstream-123"));
    let resp = app.send(req).await;

    assert_eq!(resp.headers.get("x-request-id").unwrap(), "upstream-123");

    let resp = app.get("/api/session", None).await;
    assert!(!resp.headers.get("x-request-id").unwrap().is_empty());
}

// ============================================================================
// Locale
// ============================================================================

#[tokio::test]
async fn test_locale_defaults_to_configured_country() {
    let app = TestStorefront::new();

    let resp = app.get("/api/locale", None).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, json!({ "country": "US", "currency": "USD" }));
}

#[tokio::test]
async fn test_locale_from_geolocation_header() {
    let app = TestStorefront::new();

    let mut req = request(Method::GET, "/api/locale", None, None);
    req.headers_mut()
        .insert("cf-ipcountry", HeaderValue::from_static("GB"));
    let resp = app.send(req).await;

    assert_eq!(resp.body, json!({ "country": "GB", "currency": "GBP" }));
}

#[tokio::test]
async fn test_locale_cookie_wins_over_geolocation() {
    let app = TestStorefront::new();

    let mut req = request(Method::GET, "/api/locale", None, None);
    req.headers_mut()
        .insert("cf-ipcountry", HeaderValue::from_static("GB"));
    req.headers_mut()
        .insert(header::COOKIE, HeaderValue::from_static("country=ca"));
    let resp = app.send(req).await;

    assert_eq!(resp.body, json!({ "country": "CA", "currency": "CAD" }));
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_liveness() {
    let app = TestStorefront::new();

    let resp = app.get("/health", None).await;

    assert_eq!(resp.status, StatusCode::OK);
}
