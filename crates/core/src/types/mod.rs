//! Core types for Shelf.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod country;
pub mod entry;
pub mod id;
pub mod price;

pub use country::{Country, CountryError};
pub use entry::ListEntry;
pub use id::*;
pub use price::{CurrencyCode, CurrencyCodeError, Price};
