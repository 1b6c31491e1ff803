//! Type-safe price representation using decimal arithmetic.
//!
//! The Storefront API returns money as `{ amount: Decimal, currencyCode }`
//! where the amount is a decimal string. Parsing into [`Decimal`] keeps
//! precision that `f64` would lose.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while parsing a price.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Parse a price from Storefront API money fields.
    ///
    /// # Errors
    ///
    /// Returns `PriceError` if the amount is not a decimal or the currency is
    /// not one the storefront sells in.
    pub fn parse(amount: &str, currency_code: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(amount.trim())
            .map_err(|_| PriceError::InvalidAmount(amount.to_string()))?;
        let currency_code = currency_code.parse()?;
        Ok(Self::new(amount, currency_code))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount.round_dp(2)
        )
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    MXN,
}

impl CurrencyCode {
    /// Display symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD | Self::MXN => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
            Self::MXN => "MXN",
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            "MXN" => Ok(Self::MXN),
            _ => Err(PriceError::UnsupportedCurrency(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let price = Price::parse("49.9", "USD").unwrap();
        assert_eq!(price.to_string(), "$49.90");
    }

    #[test]
    fn test_display_rounds_to_cents() {
        let price = Price::parse("10.005", "EUR").unwrap();
        assert_eq!(price.to_string(), "€10.00");
    }

    #[test]
    fn test_parse_whole_amount() {
        let price = Price::parse("120", "GBP").unwrap();
        assert_eq!(price.to_string(), "£120.00");
    }

    #[test]
    fn test_parse_invalid_amount() {
        assert_eq!(
            Price::parse("abc", "USD"),
            Err(PriceError::InvalidAmount("abc".to_string()))
        );
    }

    #[test]
    fn test_parse_unknown_currency() {
        assert!(matches!(
            Price::parse("1.00", "JPY"),
            Err(PriceError::UnsupportedCurrency(_))
        ));
    }

    #[test]
    fn test_currency_code_case_insensitive() {
        assert_eq!("cad".parse::<CurrencyCode>().unwrap(), CurrencyCode::CAD);
        assert_eq!(CurrencyCode::CAD.code(), "CAD");
    }
}
