//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, transaction per request)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions)
//! 5. Rate limiting (governor), per route group

pub mod locale;
pub mod rate_limit;
pub mod request_id;
pub mod session;
pub mod shopify_customer;

pub use locale::{DetectedLocale, LocaleSource, detect_locale};
pub use rate_limit::{api_rate_limiter, auth_rate_limiter};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
pub use shopify_customer::{
    OptionalShopifyCustomer, RequireShopifyCustomer, clear_shopify_customer_token,
    set_shopify_customer_token,
};
