//! Catalog product records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{CurrencyCode, Price};

/// An immutable product record supplied by the catalog provider.
///
/// Products are read-only from the storefront core's perspective; the
/// catalog provider owns their content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Price tagged with the catalog's base currency.
    pub price: Price,
    /// Product image URL.
    pub image: String,
    /// Product category.
    pub category: ProductCategory,
    /// Units in stock.
    pub stock: u32,
    /// Region of origin.
    pub origin: String,
    /// Ordered list of benefits; the first one drives the "best for" copy.
    pub benefits: Vec<String>,
}

impl Product {
    /// The unit price amount in the base currency.
    #[must_use]
    pub const fn unit_price(&self) -> Decimal {
        self.price.amount
    }
}

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Cooking,
    Cosmetic,
    Medicinal,
    Essential,
}

impl ProductCategory {
    /// Every category, in the order the storefront lists them.
    pub const ALL: [Self; 4] = [
        Self::Cooking,
        Self::Cosmetic,
        Self::Medicinal,
        Self::Essential,
    ];

    /// Lowercase name as used in catalog data.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cooking => "cooking",
            Self::Cosmetic => "cosmetic",
            Self::Medicinal => "medicinal",
            Self::Essential => "essential",
        }
    }
}

impl core::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
