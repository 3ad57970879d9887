//! Country codes and their default storefront currency.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::price::CurrencyCode;

/// Error returned when a country code is not two ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid country code: {0:?}")]
pub struct CountryError(pub String);

/// An ISO 3166-1 alpha-2 country code, normalized to uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Country([u8; 2]);

impl Country {
    /// United States, the fallback market.
    pub const US: Self = Self(*b"US");

    /// Parse a two-letter country code.
    ///
    /// # Errors
    ///
    /// Returns an error unless the trimmed input is exactly two ASCII letters.
    pub fn parse(s: &str) -> Result<Self, CountryError> {
        match s.trim().as_bytes() {
            [a, b] if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => {
                Ok(Self([a.to_ascii_uppercase(), b.to_ascii_uppercase()]))
            }
            _ => Err(CountryError(s.to_owned())),
        }
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Both bytes are ASCII letters by construction.
        core::str::from_utf8(&self.0).unwrap_or("US")
    }

    /// The currency the storefront prices in for this market.
    ///
    /// Markets without a dedicated currency are priced in USD.
    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        match &self.0 {
            b"CA" => CurrencyCode::CAD,
            b"GB" | b"IM" | b"JE" | b"GG" => CurrencyCode::GBP,
            b"AU" => CurrencyCode::AUD,
            b"JP" => CurrencyCode::JPY,
            b"AT" | b"BE" | b"CY" | b"DE" | b"EE" | b"ES" | b"FI" | b"FR" | b"GR" | b"HR"
            | b"IE" | b"IT" | b"LT" | b"LU" | b"LV" | b"MT" | b"NL" | b"PT" | b"SI"
            | b"SK" => CurrencyCode::EUR,
            _ => CurrencyCode::USD,
        }
    }
}

impl Default for Country {
    fn default() -> Self {
        Self::US
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Country {
    type Err = CountryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Country {
    type Error = CountryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Country> for String {
    fn from(country: Country) -> Self {
        country.as_str().to_owned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case() {
        assert_eq!(Country::parse("gb").unwrap().as_str(), "GB");
        assert_eq!(Country::parse(" de ").unwrap().as_str(), "DE");
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!(Country::parse("").is_err());
        assert!(Country::parse("USA").is_err());
        assert!(Country::parse("1A").is_err());
    }

    #[test]
    fn test_currency_mapping() {
        assert_eq!(Country::parse("FR").unwrap().currency(), CurrencyCode::EUR);
        assert_eq!(Country::parse("CA").unwrap().currency(), CurrencyCode::CAD);
        assert_eq!(Country::parse("JP").unwrap().currency(), CurrencyCode::JPY);
        assert_eq!(Country::parse("BR").unwrap().currency(), CurrencyCode::USD);
    }

    #[test]
    fn test_serde_round_trip_as_string() {
        let json = serde_json::to_string(&Country::parse("au").unwrap()).unwrap();
        assert_eq!(json, "\"AU\"");
        assert!(serde_json::from_str::<Country>("\"AUS\"").is_err());
    }
}
