//! Business logic services for storefront.
//!
//! # Services
//!
//! - `wishlist` - Customer wishlist persistence and guest-list merging
//! - `analytics` - Analytics event fan-out

pub mod analytics;
pub mod wishlist;
