//! Shipping-rate quotes.
//!
//! A canned rate table standing in for a carrier API: every destination gets
//! the same three service levels. Destination inputs are accepted so the
//! calculator keeps the shape of a real quote call.

use rust_decimal::{Decimal, dec};
use serde::Serialize;

/// One quoted shipping option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingRate {
    /// Service level name.
    pub service: &'static str,
    /// Cost in the base currency.
    pub price: Decimal,
    /// Expected transit time.
    pub duration: &'static str,
}

/// Quotes shipping options for a destination.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShippingCalculator;

impl ShippingCalculator {
    /// Quote the available services for the destination.
    #[must_use]
    pub fn quote(&self, country: &str, postal_code: &str) -> Vec<ShippingRate> {
        tracing::debug!(country, postal_code, "Quoting shipping rates");
        vec![
            ShippingRate {
                service: "Express",
                price: dec!(25.99),
                duration: "2-3 days",
            },
            ShippingRate {
                service: "Standard",
                price: dec!(12.99),
                duration: "5-7 days",
            },
            ShippingRate {
                service: "Economy",
                price: dec!(8.99),
                duration: "7-10 days",
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_lists_three_services_fastest_first() {
        let rates = ShippingCalculator.quote("India", "641062");
        assert_eq!(rates.len(), 3);
        assert_eq!(rates[0].service, "Express");
        assert_eq!(rates[0].price, dec!(25.99));
        assert_eq!(rates[2].service, "Economy");
        assert_eq!(rates[2].duration, "7-10 days");
    }

    #[test]
    fn test_quote_is_destination_independent_for_now() {
        let a = ShippingCalculator.quote("India", "641062");
        let b = ShippingCalculator.quote("Germany", "10115");
        assert_eq!(a, b);
    }
}
