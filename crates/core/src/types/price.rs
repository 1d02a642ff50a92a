//! Type-safe price representation using decimal arithmetic.
//!
//! Prices on the shop are always US dollars and never negative. Raw price
//! text scraped from page markup (`"$12.99"`, `"USD 8"`) is parsed with
//! [`Price::parse_display`].

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input contains no digits.
    #[error("price is not numeric: {0:?}")]
    NotNumeric(String),
    /// The input has more significant digits than a decimal can hold.
    #[error("price is out of range: {0:?}")]
    OutOfRange(String),
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative amount of money in dollars.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Parse a price from loosely formatted display text.
    ///
    /// Every character that is not an ASCII digit or `.` is discarded first,
    /// so currency symbols, codes, thousands separators and signs are ignored.
    /// The longest leading decimal number of what remains is used:
    ///
    /// ```
    /// use smoochiie_core::Price;
    ///
    /// assert_eq!(Price::parse_display("$12.99").unwrap().to_string(), "$12.99");
    /// assert_eq!(Price::parse_display("1,299").unwrap().to_string(), "$1299.00");
    /// assert_eq!(Price::parse_display("1.2.3").unwrap().to_string(), "$1.20");
    /// assert!(Price::parse_display("free").is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotNumeric`] if no digits remain, or
    /// [`PriceError::OutOfRange`] if the number does not fit a decimal.
    pub fn parse_display(raw: &str) -> Result<Self, PriceError> {
        let mut seen_dot = false;
        let leading: String = raw
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .take_while(|c| {
                if *c == '.' {
                    if seen_dot {
                        return false;
                    }
                    seen_dot = true;
                }
                true
            })
            .collect();

        let trimmed = leading.trim_end_matches('.');
        if !trimmed.chars().any(|c| c.is_ascii_digit()) {
            return Err(PriceError::NotNumeric(raw.to_owned()));
        }

        let normalized = if trimmed.starts_with('.') {
            format!("0{trimmed}")
        } else {
            trimmed.to_owned()
        };

        let amount = Decimal::from_str(&normalized)
            .map_err(|_| PriceError::OutOfRange(raw.to_owned()))?;
        Self::new(amount)
    }

    /// Returns the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns the amount multiplied by a quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Shortest decimal rendering without trailing zeros (`12.50` -> `12.5`).
    ///
    /// Used wherever a price takes part in an identity key, so that `12.5`
    /// and `12.50` compare equal.
    #[must_use]
    pub fn canonical(&self) -> String {
        self.0.normalize().to_string()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "${cents:.2}")
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_display(s)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_dollar_amount() {
        let price = Price::parse_display("$12.99").unwrap();
        assert_eq!(price.amount(), dec("12.99"));
    }

    #[test]
    fn test_parse_ignores_currency_noise() {
        assert_eq!(Price::parse_display("USD 8").unwrap().amount(), dec("8"));
        assert_eq!(
            Price::parse_display(" $1,024.50 ").unwrap().amount(),
            dec("1024.50")
        );
    }

    #[test]
    fn test_parse_minus_sign_is_stripped() {
        assert_eq!(Price::parse_display("-5").unwrap().amount(), dec("5"));
    }

    #[test]
    fn test_parse_uses_leading_number() {
        assert_eq!(Price::parse_display("1.2.3").unwrap().amount(), dec("1.2"));
        assert_eq!(Price::parse_display("5.").unwrap().amount(), dec("5"));
        assert_eq!(Price::parse_display(".5").unwrap().amount(), dec("0.5"));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(matches!(
            Price::parse_display("free"),
            Err(PriceError::NotNumeric(_))
        ));
        assert!(matches!(
            Price::parse_display(""),
            Err(PriceError::NotNumeric(_))
        ));
        assert!(matches!(
            Price::parse_display("$."),
            Err(PriceError::NotNumeric(_))
        ));
    }

    #[test]
    fn test_parse_rejects_overflow() {
        let huge = "9".repeat(40);
        assert!(matches!(
            Price::parse_display(&huge),
            Err(PriceError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_new_rejects_negative() {
        assert_eq!(Price::new(dec("-0.01")), Err(PriceError::Negative));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_display_rounds_to_cents() {
        assert_eq!(Price::new(dec("3")).unwrap().to_string(), "$3.00");
        assert_eq!(Price::new(dec("2.005")).unwrap().to_string(), "$2.01");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_canonical_drops_trailing_zeros() {
        assert_eq!(Price::new(dec("12.50")).unwrap().canonical(), "12.5");
        assert_eq!(Price::new(dec("12.00")).unwrap().canonical(), "12");
    }

    #[test]
    fn test_times_and_sum() {
        let a = Price::new(dec("1.25")).unwrap();
        let b = Price::new(dec("10")).unwrap();
        let total: Price = [a.times(4), b].into_iter().sum();
        assert_eq!(total.amount(), dec("15"));
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let from_number: Price = serde_json::from_str("12.99").unwrap();
        let from_string: Price = serde_json::from_str("\"12.99\"").unwrap();
        assert_eq!(from_number, from_string);
        assert!(serde_json::from_str::<Price>("-1").is_err());
    }
}
