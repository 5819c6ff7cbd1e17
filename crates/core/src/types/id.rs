//! Newtype IDs for type-safe entity references.
//!
//! The external backend hands out opaque string identifiers (identity uids,
//! document ids). The `define_id!` macro wraps each kind in its own type so
//! a shop id can never be passed where an offer id is expected.

/// Macro to define a type-safe ID wrapper around an opaque backend string.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>` and `From<&str>` implementations
///
/// # Example
///
/// ```rust
/// # use galleria_core::define_id;
/// define_id!(ShopId);
/// define_id!(OfferId);
///
/// let shop_id = ShopId::new("abc123");
/// let offer_id = OfferId::new("abc123");
///
/// // These are different types, so this won't compile:
/// // let _: ShopId = offer_id;
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
            /// Create a new ID from a backend-assigned string.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
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

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }
    };
}

// Define standard entity IDs
define_id!(Uid);
define_id!(ShopId);
define_id!(OfferId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = ShopId::new("shop-1");
        assert_eq!(id.as_str(), "shop-1");
        assert_eq!(id.clone().into_inner(), "shop-1");
        assert_eq!(format!("{id}"), "shop-1");
    }

    #[test]
    fn test_id_equality() {
        assert_eq!(Uid::new("u1"), Uid::from("u1"));
        assert_ne!(Uid::new("u1"), Uid::new("u2"));
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = OfferId::new("offer-9");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"offer-9\"");

        let parsed: OfferId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
