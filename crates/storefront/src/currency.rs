//! Static currency conversion table.
//!
//! Rates are fixed multipliers relative to USD, the catalog's base currency.
//! There is no live rate feed: a production deployment would source these
//! from a market-data provider instead of constants. Conversion itself is
//! unrounded; rounding to 2 decimal places is a presentation concern and
//! happens in [`format_amount`].

use rust_decimal::{Decimal, dec};

use organic_oils_core::CurrencyCode;

/// Conversion rate for a currency, relative to USD.
#[must_use]
pub const fn rate(code: CurrencyCode) -> Decimal {
    match code {
        CurrencyCode::USD => dec!(1),
        CurrencyCode::EUR => dec!(0.85),
        CurrencyCode::GBP => dec!(0.73),
        CurrencyCode::INR => dec!(83.12),
        CurrencyCode::JPY => dec!(110.25),
        CurrencyCode::AUD => dec!(1.35),
        CurrencyCode::CAD => dec!(1.27),
        CurrencyCode::SGD => dec!(1.34),
        CurrencyCode::AED => dec!(3.67),
    }
}

/// Convert a base-currency amount into the given currency, unrounded.
#[must_use]
pub fn convert(amount: Decimal, code: CurrencyCode) -> Decimal {
    amount * rate(code)
}

/// Format an amount for display with its currency code and exactly two
/// decimal places, e.g. `"EUR 85.00"`.
#[must_use]
pub fn format_amount(amount: Decimal, code: CurrencyCode) -> String {
    format!("{code} {:.2}", amount.round_dp(2))
}
