//! JSON API handlers.

pub mod locale;
pub mod session;
pub mod wishlist;

use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON body extractor whose rejections render as `{ "error": "..." }`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
