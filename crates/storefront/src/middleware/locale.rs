//! Country and currency detection.
//!
//! Resolution order: an explicit `country` cookie (set when the shopper picks
//! a market), then Cloudflare's `cf-ipcountry` geolocation header, then the
//! configured default.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use shelf_core::{Country, CurrencyCode};
use tower_sessions::cookie::Cookie;

use crate::state::AppState;

/// Cookie holding the shopper's chosen country.
pub const COUNTRY_COOKIE: &str = "country";

/// Cloudflare geolocation header.
pub const CF_COUNTRY_HEADER: &str = "cf-ipcountry";

/// Where the detected country came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleSource {
    Cookie,
    Geolocation,
    Default,
}

/// The shopper's market.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedLocale {
    pub country: Country,
    pub source: LocaleSource,
}

impl DetectedLocale {
    /// Currency to price in.
    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.country.currency()
    }
}

fn cookie_country(headers: &HeaderMap) -> Option<Country> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == COUNTRY_COOKIE)
        .and_then(|cookie| Country::parse(cookie.value()).ok())
}

fn geolocated_country(headers: &HeaderMap) -> Option<Country> {
    headers
        .get(CF_COUNTRY_HEADER)
        .and_then(|v| v.to_str().ok())
        // Cloudflare reports "XX" when it has no data
        .filter(|code| !code.eq_ignore_ascii_case("XX"))
        .and_then(|code| Country::parse(code).ok())
}

/// Detect the shopper's country from request headers.
#[must_use]
pub fn detect_locale(headers: &HeaderMap, default: Country) -> DetectedLocale {
    if let Some(country) = cookie_country(headers) {
        return DetectedLocale {
            country,
            source: LocaleSource::Cookie,
        };
    }

    if let Some(country) = geolocated_country(headers) {
        return DetectedLocale {
            country,
            source: LocaleSource::Geolocation,
        };
    }

    DetectedLocale {
        country: default,
        source: LocaleSource::Default,
    }
}

impl FromRequestParts<AppState> for DetectedLocale {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(detect_locale(&parts.headers, state.config().default_country))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_cookie_takes_precedence() {
        let detected = detect_locale(
            &headers(&[("cookie", "theme=dark; country=ca"), ("cf-ipcountry", "GB")]),
            Country::US,
        );
        assert_eq!(detected.country, Country::parse("CA").unwrap());
        assert_eq!(detected.source, LocaleSource::Cookie);
        assert_eq!(detected.currency(), CurrencyCode::CAD);
    }

    #[test]
    fn test_geolocation_when_no_cookie() {
        let detected = detect_locale(&headers(&[("cf-ipcountry", "DE")]), Country::US);
        assert_eq!(detected.source, LocaleSource::Geolocation);
        assert_eq!(detected.currency(), CurrencyCode::EUR);
    }

    #[test]
    fn test_invalid_values_fall_back_to_default() {
        let default = Country::parse("AU").unwrap();
        let detected = detect_locale(
            &headers(&[("cookie", "country=nowhere"), ("cf-ipcountry", "XX")]),
            default,
        );
        assert_eq!(detected.country, default);
        assert_eq!(detected.source, LocaleSource::Default);
    }

    #[test]
    fn test_unknown_market_prices_in_usd() {
        let detected = detect_locale(&headers(&[("cf-ipcountry", "BR")]), Country::US);
        assert_eq!(detected.currency(), CurrencyCode::USD);
    }
}
