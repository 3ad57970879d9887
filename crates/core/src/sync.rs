//! Login-triggered wishlist sync state machine.
//!
//! A [`SyncSession`] is fed login observations and request outcomes and
//! answers with the [`SyncAction`] its driver must perform. It owns the
//! "has synced this session" flag, so two sessions never share state.
//!
//! ```text
//!            observe(true) on a false->true edge, local non-empty
//!  Awaiting ───────────────────────────────────────────────▶ Syncing
//!     │  ▲                                                    │   │
//!     │  └───────────────────── failed() ─────────────────────┘   │ succeeded()
//!     │ edge with empty local                                     ▼
//!     └─────────────────────────────────────────────────────▶ Synced
//!
//!  signed in ── observe(false) ──▶ LoggedOut ── observe(true) ──▶ (edge)
//! ```
//!
//! Being logged in at mount is not an edge: a normal authenticated page load
//! never syncs.

use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// Position of a session in the sync lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    /// Not mounted yet; the first observation only records the login flag.
    Idle,
    /// Waiting for a false -> true login edge.
    AwaitingLoginTransition,
    /// A sync request is outstanding.
    Syncing,
    /// The guest wishlist has been merged for this login session.
    Synced,
    /// The visitor is logged out.
    LoggedOut,
}

/// What the driver must do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// Nothing to do.
    None,
    /// Submit these ids to the sync endpoint and report the outcome back.
    Submit(Vec<ProductId>),
    /// The server confirmed the merge; clear the local wishlist.
    ClearLocal,
}

/// Session-scoped sync state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSession {
    state: SyncState,
    was_logged_in: bool,
    has_synced: bool,
}

impl Default for SyncSession {
    fn default() -> Self {
        Self::idle()
    }
}

impl SyncSession {
    /// A session that has not observed the login flag yet.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            state: SyncState::Idle,
            was_logged_in: false,
            has_synced: false,
        }
    }

    /// A session mounted with the given login flag.
    #[must_use]
    pub const fn mounted(logged_in: bool) -> Self {
        Self {
            state: SyncState::AwaitingLoginTransition,
            was_logged_in: logged_in,
            has_synced: false,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> SyncState {
        self.state
    }

    /// Whether the guest wishlist was merged during this login session.
    #[must_use]
    pub const fn has_synced(&self) -> bool {
        self.has_synced
    }

    /// Feed the current login flag and the guest wishlist ids.
    ///
    /// Returns [`SyncAction::Submit`] at most once per login session, and only
    /// on a false -> true edge with a non-empty local wishlist.
    pub fn observe_login(&mut self, logged_in: bool, local: &[ProductId]) -> SyncAction {
        if self.state == SyncState::Idle {
            *self = Self::mounted(logged_in);
            return SyncAction::None;
        }

        if !logged_in {
            // A guest seen again stays armed; only a signed-in session logs out.
            let signed_out = self.was_logged_in
                || matches!(self.state, SyncState::Syncing | SyncState::Synced);
            if signed_out {
                self.state = SyncState::LoggedOut;
            }
            self.was_logged_in = false;
            self.has_synced = false;
            return SyncAction::None;
        }

        let edge = !self.was_logged_in;
        self.was_logged_in = true;

        if !edge || self.has_synced || self.state == SyncState::Syncing {
            return SyncAction::None;
        }

        if local.is_empty() {
            self.state = SyncState::Synced;
            self.has_synced = true;
            return SyncAction::None;
        }

        self.state = SyncState::Syncing;
        SyncAction::Submit(local.to_vec())
    }

    /// The sync endpoint confirmed the merge.
    ///
    /// Responses arriving after the session left `Syncing` (for example after
    /// a logout) are ignored; local state is kept and a later login merges it
    /// again.
    pub fn succeeded(&mut self) -> SyncAction {
        if self.state != SyncState::Syncing {
            return SyncAction::None;
        }
        self.state = SyncState::Synced;
        self.has_synced = true;
        SyncAction::ClearLocal
    }

    /// The sync request failed (transport, auth, or server error).
    ///
    /// Local state is kept and the session re-arms: the next observation of a
    /// logged-in flag counts as a fresh edge.
    pub fn failed(&mut self) {
        if self.state != SyncState::Syncing {
            return;
        }
        self.state = SyncState::AwaitingLoginTransition;
        self.was_logged_in = false;
    }
}
