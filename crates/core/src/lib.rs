//! Shelf Core - shared types and pure logic.
//!
//! This crate provides what both sides of guest-state sync agree on:
//! - `storefront` - the server that owns each customer's wishlist
//! - `cli` - the guest client that keeps local lists and triggers sync on login
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no storage. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product ids, prices, countries, and list entries
//! - [`list`] - Insertion policies of the wishlist, recently viewed, and comparison lists
//! - [`merge`] - Set-union reconciliation of a guest wishlist into a server wishlist
//! - [`sync`] - Login-triggered sync state machine
//! - [`wire`] - Request and response bodies of the storefront API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod list;
pub mod merge;
pub mod sync;
pub mod types;
pub mod wire;

pub use list::{InsertOutcome, ListKind};
pub use merge::{MergeOutcome, merge, merge_with_outcome};
pub use sync::{SyncAction, SyncSession, SyncState};
pub use types::*;
