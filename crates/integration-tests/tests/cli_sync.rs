//! End-to-end tests: the guest client syncing against a live storefront.

#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;
use std::sync::Arc;

use shelf_cli::storage::MemoryStorage;
use shelf_cli::store::LocalListStore;
use shelf_cli::sync::{HttpSyncTransport, SyncOrchestrator, SyncTransport, TransportError};
use shelf_core::{CustomerId, ListEntry, ListKind, ProductId, SyncState};
use shelf_integration_tests::{TestStorefront, session_cookie};

fn id(s: &str) -> ProductId {
    ProductId::parse(s).unwrap()
}

async fn live_login(addr: SocketAddr, token: &str) -> String {
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/test/login/{token}"))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    session_cookie(resp.headers()).unwrap()
}

fn guest_wishlist(items: &[&str]) -> LocalListStore<MemoryStorage> {
    let wishlist = LocalListStore::new(Arc::new(MemoryStorage::new()), ListKind::Wishlist);
    for item in items {
        wishlist.add(ListEntry::new(id(item)));
    }
    wishlist
}

#[tokio::test]
async fn test_login_syncs_and_clears_guest_wishlist() {
    let app = TestStorefront::new();
    app.store.insert_account(
        "tok-1",
        CustomerId::parse("gid://shopify/Customer/1").unwrap(),
        Some(r#"["s1"]"#),
    );
    let addr = app.spawn().await;
    let cookie = live_login(addr, "tok-1").await;

    let transport = HttpSyncTransport::new(&format!("http://{addr}/"), Some(cookie));
    let mut sync = SyncOrchestrator::new(guest_wishlist(&["g1", "s1"]), transport);

    // The page was loaded while signed out
    sync.start(false);
    assert_eq!(sync.poll().await.unwrap(), SyncState::Synced);
    assert_eq!(sync.poll().await.unwrap(), SyncState::Synced);

    assert!(sync.wishlist().get().is_empty());
    assert_eq!(app.store.stored_ids("tok-1"), vec![id("s1"), id("g1")]);
    assert_eq!(app.store.writes(), 1);
}

#[tokio::test]
async fn test_signed_out_session_does_not_sync() {
    let app = TestStorefront::new();
    let addr = app.spawn().await;

    let transport = HttpSyncTransport::new(&format!("http://{addr}"), None);
    let mut sync = SyncOrchestrator::new(guest_wishlist(&["g1"]), transport);

    sync.start(false);
    assert_eq!(
        sync.poll().await.unwrap(),
        SyncState::AwaitingLoginTransition
    );
    assert_eq!(sync.wishlist().ids(), vec![id("g1")]);
    assert_eq!(app.store.reads(), 0);
}

#[tokio::test]
async fn test_failed_sync_keeps_guest_wishlist() {
    let app = TestStorefront::new();
    app.store.insert_account(
        "tok-1",
        CustomerId::parse("gid://shopify/Customer/1").unwrap(),
        None,
    );
    app.store.set_fail_writes(true);
    let addr = app.spawn().await;
    let cookie = live_login(addr, "tok-1").await;

    let transport = HttpSyncTransport::new(&format!("http://{addr}"), Some(cookie));
    let mut sync = SyncOrchestrator::new(guest_wishlist(&["g1"]), transport);

    sync.start(false);
    assert_eq!(
        sync.poll().await.unwrap(),
        SyncState::AwaitingLoginTransition
    );
    assert_eq!(sync.wishlist().ids(), vec![id("g1")]);

    // The next observation retries
    app.store.set_fail_writes(false);
    assert_eq!(sync.poll().await.unwrap(), SyncState::Synced);
    assert!(sync.wishlist().get().is_empty());
    assert_eq!(app.store.stored_ids("tok-1"), vec![id("g1")]);
}

#[tokio::test]
async fn test_transport_maps_unauthorized() {
    let app = TestStorefront::new();
    let addr = app.spawn().await;

    let transport = HttpSyncTransport::new(&format!("http://{addr}"), None);

    assert!(!transport.logged_in().await.unwrap());
    assert!(matches!(
        transport.submit(&[id("g1")]).await,
        Err(TransportError::Unauthorized)
    ));
}

#[tokio::test]
async fn test_transport_surfaces_server_errors() {
    let app = TestStorefront::new();
    app.store.insert_account(
        "tok-1",
        CustomerId::parse("gid://shopify/Customer/1").unwrap(),
        None,
    );
    app.store.set_fail_reads(true);
    let addr = app.spawn().await;
    let cookie = live_login(addr, "tok-1").await;

    let transport = HttpSyncTransport::new(&format!("http://{addr}"), Some(cookie));

    match transport.submit(&[id("g1")]).await {
        Err(TransportError::Server { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.starts_with("Failed to read wishlist"));
        }
        other => panic!("expected server error, got {other:?}"),
    }
}
