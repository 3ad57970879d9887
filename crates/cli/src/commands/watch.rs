//! Watch the login status and sync the guest wishlist on sign-in.
//!
//! The first check only records whether the session is signed in. A later
//! check that sees a signed-out session become signed in submits the local
//! wishlist once and clears it after the storefront confirms the merge.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use shelf_cli::storage::FileStorage;
use shelf_cli::store::LocalListStore;
use shelf_cli::sync::{HttpSyncTransport, SyncOrchestrator};
use shelf_core::{ListKind, SyncState};

/// Poll until interrupted.
///
/// # Errors
///
/// Returns an error if the Ctrl+C handler cannot be installed.
pub async fn run(
    profile: &Path,
    server: &str,
    session: Option<String>,
    interval_secs: u64,
) -> Result<(), std::io::Error> {
    let wishlist = LocalListStore::new(Arc::new(FileStorage::new(profile)), ListKind::Wishlist);
    let transport = HttpSyncTransport::new(server, session);
    let mut sync = SyncOrchestrator::new(wishlist, transport);

    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    let mut last = sync.state();

    tracing::info!(server, profile = %profile.display(), "Watching login status");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match sync.poll().await {
                    Ok(state) if state != last => {
                        tracing::info!(?state, "Sync state changed");
                        if state == SyncState::Synced {
                            tracing::info!(
                                remaining = sync.wishlist().ids().len(),
                                "Guest wishlist synced"
                            );
                        }
                        last = state;
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!(error = %e, "Login status check failed"),
                }
            }
            result = tokio::signal::ctrl_c() => {
                result?;
                tracing::info!("Stopped watching");
                return Ok(());
            }
        }
    }
}
