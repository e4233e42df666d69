//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

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

    /// Format for display with the currency code, e.g. `"USD 19.99"`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} {:.2}", self.currency_code, self.amount)
    }
}

/// ISO 4217 currency codes offered at checkout.
///
/// USD is the base currency: catalog prices are natively expressed in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    INR,
    JPY,
    AUD,
    CAD,
    SGD,
    AED,
}

impl CurrencyCode {
    /// Every currency offered at checkout, in display order.
    pub const ALL: [Self; 9] = [
        Self::USD,
        Self::EUR,
        Self::GBP,
        Self::INR,
        Self::JPY,
        Self::AUD,
        Self::CAD,
        Self::SGD,
        Self::AED,
    ];

    /// The three-letter code as a string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::INR => "INR",
            Self::JPY => "JPY",
            Self::AUD => "AUD",
            Self::CAD => "CAD",
            Self::SGD => "SGD",
            Self::AED => "AED",
        }
    }
}

impl core::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    #[test]
    fn test_price_display() {
        let price = Price::new(dec!(19.99), CurrencyCode::USD);
        assert_eq!(price.display(), "USD 19.99");

        let price = Price::new(dec!(85), CurrencyCode::EUR);
        assert_eq!(price.display(), "EUR 85.00");
    }

    #[test]
    fn test_default_is_base_currency() {
        assert_eq!(CurrencyCode::default(), CurrencyCode::USD);
    }

    #[test]
    fn test_all_covers_every_code() {
        assert_eq!(CurrencyCode::ALL.len(), 9);
        assert_eq!(CurrencyCode::ALL[0], CurrencyCode::USD);
    }

    #[test]
    fn test_serde_code_names() {
        let json = serde_json::to_string(&CurrencyCode::AED).unwrap();
        assert_eq!(json, "\"AED\"");
    }
}
