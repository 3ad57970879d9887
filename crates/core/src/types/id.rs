//! Newtype IDs for type-safe entity references.
//!
//! Shopify identifies products and customers with opaque global IDs
//! (`gid://shopify/Product/123`). Use the `define_id!` macro to create
//! string-backed wrappers that prevent accidentally mixing IDs from different
//! entity types.

use thiserror::Error;

/// Errors that can occur when parsing an ID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The input was empty or only whitespace.
    #[error("id cannot be empty")]
    Empty,
    /// The input is longer than the maximum allowed length.
    #[error("id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` as a plain string, deserializing through `parse()`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `parse()` which trims the input and rejects blank or oversized values
/// - `as_str()`, `into_inner()`, `Display`, `FromStr`, `AsRef<str>`
///
/// # Example
///
/// ```rust
/// # use shelf_core::define_id;
/// define_id!(ProductId);
/// define_id!(CustomerId);
///
/// let product = ProductId::parse("gid://shopify/Product/1").unwrap();
/// let customer = CustomerId::parse("gid://shopify/Customer/1").unwrap();
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = customer;
/// # let _ = (product, customer);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Maximum accepted length of an ID.
            pub const MAX_LENGTH: usize = 255;

            /// Parse an ID, trimming surrounding whitespace.
            ///
            /// # Errors
            ///
            /// Returns an error if the trimmed input is empty or longer than
            /// `MAX_LENGTH` characters.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::IdError> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err($crate::IdError::Empty);
                }
                if trimmed.len() > Self::MAX_LENGTH {
                    return Err($crate::IdError::TooLong {
                        max: Self::MAX_LENGTH,
                    });
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Returns the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the ID and returns its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl ::core::convert::TryFrom<String> for $name {
            type Error = $crate::IdError;

            fn try_from(s: String) -> ::core::result::Result<Self, Self::Error> {
                Self::parse(&s)
            }
        }

        impl ::core::convert::From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(CustomerId);

/// Parse a list of raw identifiers, dropping blank or invalid entries.
///
/// Returns the parsed IDs (in input order) and the number of entries dropped.
#[must_use]
pub fn parse_product_ids<I, S>(raw: I) -> (Vec<ProductId>, usize)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut dropped = 0;
    let ids = raw
        .into_iter()
        .filter_map(|s| {
            ProductId::parse(s.as_ref())
                .inspect_err(|_| dropped += 1)
                .ok()
        })
        .collect();
    (ids, dropped)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let id = ProductId::parse("  gid://shopify/Product/1 ").unwrap();
        assert_eq!(id.as_str(), "gid://shopify/Product/1");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(ProductId::parse(""), Err(IdError::Empty));
        assert_eq!(ProductId::parse("   "), Err(IdError::Empty));
    }

    #[test]
    fn test_parse_rejects_too_long() {
        let long = "x".repeat(ProductId::MAX_LENGTH + 1);
        assert!(matches!(
            ProductId::parse(&long),
            Err(IdError::TooLong { .. })
        ));
    }

    #[test]
    fn test_serde_is_a_plain_string() {
        let id = ProductId::parse("p1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"p1\"");
        let back: ProductId = serde_json::from_str("\"p1\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_deserialize_validates() {
        let trimmed: ProductId = serde_json::from_str("\"  p1 \"").unwrap();
        assert_eq!(trimmed.as_str(), "p1");

        assert!(serde_json::from_str::<ProductId>("\"   \"").is_err());
        assert!(serde_json::from_str::<CustomerId>("\"\"").is_err());
    }

    #[test]
    fn test_parse_product_ids_drops_invalid() {
        let (ids, dropped) = parse_product_ids(["p1", "", " p2 ", "  "]);
        assert_eq!(dropped, 2);
        assert_eq!(
            ids.iter().map(ProductId::as_str).collect::<Vec<_>>(),
            vec!["p1", "p2"]
        );
    }
}
