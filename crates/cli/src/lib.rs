//! Shelf guest client.
//!
//! Keeps the three guest lists in a local profile directory and merges the
//! guest wishlist into the customer's account the first time a session is
//! seen signed in.
//!
//! # Modules
//!
//! - [`storage`] - Key-value slots backing the lists (files, or memory in tests)
//! - [`store`] - Per-list persistence applying each list's insertion policy
//! - [`sync`] - Login-triggered wishlist sync against the storefront API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod storage;
pub mod store;
pub mod sync;
