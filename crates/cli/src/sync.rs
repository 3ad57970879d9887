//! Login-triggered wishlist sync, client side.
//!
//! [`SyncOrchestrator`] feeds login observations into a
//! [`SyncSession`](shelf_core::SyncSession) and carries out the actions it
//! returns: submit the local wishlist, then clear it once the storefront
//! confirms the merge. A failed submission leaves the local list untouched.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::COOKIE;
use shelf_core::wire::{ErrorBody, SESSION_COOKIE_NAME, SessionStatus, SyncRequest, SyncResponse};
use shelf_core::{ProductId, SyncAction, SyncSession, SyncState};
use thiserror::Error;

use crate::storage::LocalStorage;
use crate::store::LocalListStore;

/// Errors talking to the storefront.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request did not complete.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The storefront does not consider this session signed in.
    #[error("Not authenticated")]
    Unauthorized,

    /// The storefront answered with an error.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
}

/// Storefront calls needed by the sync driver.
#[async_trait]
pub trait SyncTransport: Send + Sync {
    /// Whether the current session is signed in.
    async fn logged_in(&self) -> Result<bool, TransportError>;

    /// Submit the guest wishlist for merging.
    async fn submit(&self, ids: &[ProductId]) -> Result<SyncResponse, TransportError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// HTTP transport
// ─────────────────────────────────────────────────────────────────────────────

/// Talks to a storefront over HTTP, presenting a session cookie.
#[derive(Debug, Clone)]
pub struct HttpSyncTransport {
    client: reqwest::Client,
    base_url: String,
    session: Option<String>,
}

impl HttpSyncTransport {
    /// `session` is the value of the storefront session cookie, if any.
    #[must_use]
    pub fn new(base_url: &str, session: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{path}", self.base_url));
        match &self.session {
            Some(value) => builder.header(COOKIE, format!("{SESSION_COOKIE_NAME}={value}")),
            None => builder,
        }
    }

    async fn error_from(response: reqwest::Response) -> TransportError {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return TransportError::Unauthorized;
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
        };
        TransportError::Server {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl SyncTransport for HttpSyncTransport {
    async fn logged_in(&self) -> Result<bool, TransportError> {
        let response = self
            .request(reqwest::Method::GET, "/api/session")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let status: SessionStatus = response.json().await?;
        Ok(status.logged_in)
    }

    async fn submit(&self, ids: &[ProductId]) -> Result<SyncResponse, TransportError> {
        let response = self
            .request(reqwest::Method::POST, "/api/wishlist/sync")
            .json(&SyncRequest::from_ids(ids))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        Ok(response.json().await?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ─────────────────────────────────────────────────────────────────────────────

/// Drives one login session's wishlist sync.
pub struct SyncOrchestrator<S, T> {
    session: SyncSession,
    wishlist: LocalListStore<S>,
    transport: T,
}

impl<S: LocalStorage, T: SyncTransport> SyncOrchestrator<S, T> {
    /// A driver that has not observed the login flag yet.
    #[must_use]
    pub fn new(wishlist: LocalListStore<S>, transport: T) -> Self {
        Self {
            session: SyncSession::idle(),
            wishlist,
            transport,
        }
    }

    #[must_use]
    pub const fn state(&self) -> SyncState {
        self.session.state()
    }

    #[must_use]
    pub const fn wishlist(&self) -> &LocalListStore<S> {
        &self.wishlist
    }

    /// Arm the driver with the login flag at startup.
    ///
    /// Being signed in already is not a login edge; nothing is submitted.
    pub fn start(&mut self, logged_in: bool) {
        if self.session.state() == SyncState::Idle {
            self.session.observe_login(logged_in, &[]);
        }
    }

    /// Feed one login observation and perform whatever it triggers.
    pub async fn observe(&mut self, logged_in: bool) -> SyncState {
        let local = self.wishlist.ids();
        let action = self.session.observe_login(logged_in, &local);

        if let SyncAction::Submit(ids) = action {
            self.submit(&ids).await;
        }

        self.session.state()
    }

    /// Ask the storefront for the login flag and observe it.
    ///
    /// # Errors
    ///
    /// Returns an error if the login status cannot be fetched. The session is
    /// left as it was.
    pub async fn poll(&mut self) -> Result<SyncState, TransportError> {
        let logged_in = self.transport.logged_in().await?;
        Ok(self.observe(logged_in).await)
    }

    async fn submit(&mut self, ids: &[ProductId]) {
        tracing::info!(items = ids.len(), "Syncing guest wishlist");

        match self.transport.submit(ids).await {
            Ok(response) => {
                tracing::info!(
                    added = response.count,
                    total = ?response.total_items,
                    "Guest wishlist merged"
                );
                if self.session.succeeded() == SyncAction::ClearLocal {
                    self.wishlist.clear();
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Wishlist sync failed; keeping local list");
                self.session.failed();
            }
        }
    }
}
