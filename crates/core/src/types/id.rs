//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Catalog product ids
//! and gateway transaction ids are provider-supplied opaque strings; order
//! ids are generated locally as UUIDs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to define a type-safe ID wrapper around an opaque string.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<&str>` and `From<String>` implementations
///
/// # Example
///
/// ```rust
/// # use ucdrop_core::define_id;
/// define_id!(ProductId);
/// define_id!(TransactionId);
///
/// let product_id = ProductId::new("p1");
/// let txn_id = TransactionId::new("MOCK_TXN_1");
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = txn_id;
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
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

// Provider-supplied opaque identifiers
define_id!(ProductId);
define_id!(TransactionId);

/// An opaque order identifier.
///
/// Generated locally when an order is created. The id doubles as the
/// capability for looking the order up, so it must be unguessable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Generate a fresh random order id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an order id from its string form.
    ///
    /// # Errors
    ///
    /// Returns `uuid::Error` if the input is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for OrderId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Errors that can occur when parsing a [`PlayerId`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlayerIdError {
    /// The input is shorter than the minimum resolvable length.
    #[error("player id must be at least {min} characters", min = PlayerId::MIN_LENGTH)]
    TooShort,
    /// The input exceeds the maximum length any provider uses.
    #[error("player id must be at most {max} characters", max = PlayerId::MAX_LENGTH)]
    TooLong,
    /// The input contains whitespace or control characters.
    #[error("player id must not contain whitespace")]
    InvalidCharacters,
}

/// An external game-account identifier supplied by the buyer.
///
/// The format is provider-specific, so validation is intentionally loose:
/// a length window and no whitespace. Anything below [`PlayerId::MIN_LENGTH`]
/// is rejected before a resolution call is ever attempted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Minimum identifier length worth sending to the identity provider.
    pub const MIN_LENGTH: usize = 6;

    /// Maximum identifier length accepted.
    pub const MAX_LENGTH: usize = 32;

    /// Parse a `PlayerId` from buyer input.
    ///
    /// # Errors
    ///
    /// Returns `PlayerIdError` if the input is outside the length window or
    /// contains whitespace.
    pub fn parse(s: &str) -> Result<Self, PlayerIdError> {
        if s.len() < Self::MIN_LENGTH {
            return Err(PlayerIdError::TooShort);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(PlayerIdError::TooLong);
        }
        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(PlayerIdError::InvalidCharacters);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the id and return its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PlayerId {
    type Err = PlayerIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_roundtrip() {
        let id = ProductId::new("p1");
        assert_eq!(id.as_str(), "p1");
        assert_eq!(id.to_string(), "p1");

        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"p1\"");
        let parsed: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_order_id_generate_unique() {
        let a = OrderId::generate();
        let b = OrderId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_order_id_parse_roundtrip() {
        let id = OrderId::generate();
        let parsed = OrderId::parse(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_order_id_parse_rejects_garbage() {
        assert!(OrderId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn test_player_id_min_length() {
        assert!(matches!(
            PlayerId::parse("12345"),
            Err(PlayerIdError::TooShort)
        ));
        assert!(PlayerId::parse("123456").is_ok());
    }

    #[test]
    fn test_player_id_max_length() {
        let long = "1".repeat(PlayerId::MAX_LENGTH + 1);
        assert!(matches!(
            PlayerId::parse(&long),
            Err(PlayerIdError::TooLong)
        ));
    }

    #[test]
    fn test_player_id_rejects_whitespace() {
        assert!(matches!(
            PlayerId::parse("123 456"),
            Err(PlayerIdError::InvalidCharacters)
        ));
    }

    #[test]
    fn test_player_id_accepts_alphanumeric() {
        let id = PlayerId::parse("Abc123xyz").unwrap();
        assert_eq!(id.as_str(), "Abc123xyz");
    }
}
