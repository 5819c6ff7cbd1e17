//! Offer price type backed by decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price is not a number: {0:?}")]
    NotANumber(String),
    /// The input is a number but below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// An offer price.
///
/// Prices come in from admin forms as free text; anything that does not
/// parse as a non-negative decimal is rejected here rather than stored,
/// so price comparison never sees a non-numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Parse a price from form input.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotANumber`] if the input is not a decimal, or
    /// [`PriceError::Negative`] for negative amounts.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let s = s.trim();
        let amount: Decimal = s
            .parse()
            .map_err(|_| PriceError::NotANumber(s.to_owned()))?;

        if amount.is_sign_negative() {
            return Err(PriceError::Negative);
        }

        Ok(Self(amount))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_prices() {
        assert_eq!(Price::parse("10").unwrap().to_string(), "10");
        assert_eq!(Price::parse("19.99").unwrap().to_string(), "19.99");
        assert_eq!(Price::parse(" 0 ").unwrap().to_string(), "0");
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(matches!(
            Price::parse("free"),
            Err(PriceError::NotANumber(_))
        ));
        assert!(matches!(Price::parse(""), Err(PriceError::NotANumber(_))));
        assert!(matches!(
            Price::parse("12,50"),
            Err(PriceError::NotANumber(_))
        ));
    }

    #[test]
    fn test_parse_rejects_negative() {
        assert!(matches!(Price::parse("-3"), Err(PriceError::Negative)));
    }

    #[test]
    fn test_ordering() {
        let cheap = Price::parse("8").unwrap();
        let mid = Price::parse("8.00").unwrap();
        let dear = Price::parse("10").unwrap();

        assert!(cheap < dear);
        // Decimal equality ignores trailing zeros in comparison.
        assert_eq!(cheap.cmp(&mid), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_serde_roundtrip() {
        let price = Price::parse("19.99").unwrap();
        let json = serde_json::to_string(&price).unwrap();
        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, price);
    }
}
