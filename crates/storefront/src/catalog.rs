//! Read-only product catalog.
//!
//! The catalog provider supplies an ordered list of [`Product`] records at
//! startup; the storefront core never mutates them. [`Catalog`] wraps that
//! list behind an `Arc` so the cart, the chat assistant, and the UI can all
//! hold cheap clones of the same data.

use std::sync::Arc;

use rust_decimal::{Decimal, dec};

use organic_oils_core::{CurrencyCode, Price, Product, ProductCategory, ProductId};

/// Ordered, read-only product collection.
///
/// Insertion order is display order.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Arc<Vec<Product>>,
}

impl Catalog {
    /// Create a catalog from a provider-supplied product list.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        tracing::info!(count = products.len(), "Catalog loaded");
        Self {
            products: Arc::new(products),
        }
    }

    /// The built-in organic-oil product range.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(builtin_products())
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// All products in display order.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// First product whose name or description contains the query,
    /// case-insensitively. Used by the chat assistant for product lookups.
    #[must_use]
    pub fn find_matching(&self, query: &str) -> Option<&Product> {
        let query = query.to_lowercase();
        self.products.iter().find(|p| {
            p.name.to_lowercase().contains(&query)
                || p.description.to_lowercase().contains(&query)
        })
    }

    /// All products whose name or description contains the query,
    /// case-insensitively.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let query = query.to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&query)
                    || p.description.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Products matching every set criterion of the filter.
    #[must_use]
    pub fn filter(&self, filter: &CatalogFilter) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| filter.matches(p))
            .collect()
    }

    /// Up to three region-appropriate products.
    ///
    /// India favors cooking and medicinal oils; everywhere else favors
    /// cosmetic and essential oils. A deterministic rule, not a learned
    /// model.
    #[must_use]
    pub fn recommend_for_region(&self, region: &str) -> Vec<&Product> {
        let categories: [ProductCategory; 2] = if region.eq_ignore_ascii_case("india") {
            [ProductCategory::Cooking, ProductCategory::Medicinal]
        } else {
            [ProductCategory::Cosmetic, ProductCategory::Essential]
        };

        self.products
            .iter()
            .filter(|p| categories.contains(&p.category))
            .take(3)
            .collect()
    }
}

/// Combined search criteria for the products page.
///
/// Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    /// Case-insensitive substring match on name or description.
    pub query: Option<String>,
    /// Category the product must belong to.
    pub category: Option<ProductCategory>,
    /// Price band the product must fall into.
    pub price_range: Option<PriceRange>,
}

impl CatalogFilter {
    fn matches(&self, product: &Product) -> bool {
        if let Some(query) = &self.query {
            let query = query.to_lowercase();
            if !product.name.to_lowercase().contains(&query)
                && !product.description.to_lowercase().contains(&query)
            {
                return false;
            }
        }
        if let Some(category) = self.category
            && product.category != category
        {
            return false;
        }
        if let Some(range) = &self.price_range
            && !range.contains(product.unit_price())
        {
            return false;
        }
        true
    }
}

/// An inclusive price band in the base currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRange {
    /// Lower bound, inclusive.
    pub min: Decimal,
    /// Upper bound, inclusive; `None` means unbounded.
    pub max: Option<Decimal>,
}

impl PriceRange {
    /// Under $20.
    #[must_use]
    pub const fn under_20() -> Self {
        Self {
            min: dec!(0),
            max: Some(dec!(20)),
        }
    }

    /// $20 - $50.
    #[must_use]
    pub const fn from_20_to_50() -> Self {
        Self {
            min: dec!(20),
            max: Some(dec!(50)),
        }
    }

    /// Over $50.
    #[must_use]
    pub const fn over_50() -> Self {
        Self {
            min: dec!(50),
            max: None,
        }
    }

    /// Whether the price falls inside the band.
    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && self.max.is_none_or(|max| price <= max)
    }
}

/// The eight products of the built-in range.
fn builtin_products() -> Vec<Product> {
    fn product(
        id: &str,
        name: &str,
        description: &str,
        price: Decimal,
        image: &str,
        category: ProductCategory,
        stock: u32,
        origin: &str,
        benefits: &[&str],
    ) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            description: description.to_owned(),
            price: Price::new(price, CurrencyCode::USD),
            image: image.to_owned(),
            category,
            stock,
            origin: origin.to_owned(),
            benefits: benefits.iter().map(|&b| b.to_owned()).collect(),
        }
    }

    vec![
        product(
            "1",
            "Pure Coconut Oil",
            "Cold-pressed organic coconut oil from Kerala, India",
            dec!(24.99),
            "https://images.unsplash.com/photo-1621939514649-280e2ee25f60?auto=format&fit=crop&q=80&w=800",
            ProductCategory::Cooking,
            50,
            "Kerala",
            &["Cooking", "Hair Care", "Skin Care"],
        ),
        product(
            "2",
            "Mustard Oil",
            "Traditional cold-pressed mustard oil from Bengal",
            dec!(19.99),
            "https://images.unsplash.com/photo-1620706857370-e1b9770e8bb1?auto=format&fit=crop&q=80&w=800",
            ProductCategory::Cooking,
            45,
            "Bengal",
            &["Cooking", "Massage", "Medicinal"],
        ),
        product(
            "3",
            "Organic Sesame Oil",
            "Premium cold-pressed sesame oil for authentic Indian cooking",
            dec!(22.99),
            "https://images.unsplash.com/photo-1474979266404-7eaacbcd87c5?auto=format&fit=crop&q=80&w=800",
            ProductCategory::Cooking,
            30,
            "Tamil Nadu",
            &["Cooking", "Ayurvedic Medicine"],
        ),
        product(
            "4",
            "Almond Oil",
            "Pure cold-pressed almond oil for skin and hair care",
            dec!(29.99),
            "https://images.unsplash.com/photo-1611070160535-6613d1cda2bc?auto=format&fit=crop&q=80&w=800",
            ProductCategory::Cosmetic,
            25,
            "Kashmir",
            &["Hair Care", "Skin Care", "Massage"],
        ),
        product(
            "5",
            "Neem Oil",
            "Traditional ayurvedic neem oil for natural skincare",
            dec!(18.99),
            "https://images.unsplash.com/photo-1608571423902-eed4a5ad8108?auto=format&fit=crop&q=80&w=800",
            ProductCategory::Cosmetic,
            40,
            "Karnataka",
            &["Skin Care", "Natural Pesticide", "Medicinal"],
        ),
        product(
            "6",
            "Castor Oil",
            "Pure organic castor oil for hair growth and skincare",
            dec!(16.99),
            "https://images.unsplash.com/photo-1612540139150-4e71d7b3b955?auto=format&fit=crop&q=80&w=800",
            ProductCategory::Cosmetic,
            35,
            "Gujarat",
            &["Hair Growth", "Skin Care", "Medicinal"],
        ),
        product(
            "7",
            "Black Seed Oil",
            "Premium black seed oil with natural healing properties",
            dec!(27.99),
            "https://images.unsplash.com/photo-1615485290382-441e4d049cb5?auto=format&fit=crop&q=80&w=800",
            ProductCategory::Medicinal,
            20,
            "Rajasthan",
            &["Immune Support", "Digestive Health", "Skin Care"],
        ),
        product(
            "8",
            "Eucalyptus Oil",
            "Pure eucalyptus essential oil for aromatherapy",
            dec!(15.99),
            "https://images.unsplash.com/photo-1608571423902-eed4a5ad8108?auto=format&fit=crop&q=80&w=800",
            ProductCategory::Essential,
            50,
            "Kerala",
            &["Aromatherapy", "Respiratory Health", "Natural Cleaner"],
        ),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_order_and_lookup() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 8);
        assert_eq!(catalog.all()[0].name, "Pure Coconut Oil");

        let coconut = catalog.get(&ProductId::new("1")).unwrap();
        assert_eq!(coconut.unit_price(), dec!(24.99));
        assert!(catalog.get(&ProductId::new("999")).is_none());
    }

    #[test]
    fn test_find_matching_is_case_insensitive() {
        let catalog = Catalog::builtin();
        let hit = catalog.find_matching("COCONUT").unwrap();
        assert_eq!(hit.id, ProductId::new("1"));

        // Description matches count too.
        let hit = catalog.find_matching("bengal").unwrap();
        assert_eq!(hit.name, "Mustard Oil");

        assert!(catalog.find_matching("xyzzy123").is_none());
    }

    #[test]
    fn test_search_returns_all_matches() {
        let catalog = Catalog::builtin();
        let hits = catalog.search("oil");
        assert_eq!(hits.len(), 8);

        let hits = catalog.search("cold-pressed");
        assert!(hits.len() >= 3);
    }

    #[test]
    fn test_filter_by_category_and_price() {
        let catalog = Catalog::builtin();

        let cooking = catalog.filter(&CatalogFilter {
            category: Some(ProductCategory::Cooking),
            ..CatalogFilter::default()
        });
        assert_eq!(cooking.len(), 3);

        let under_20 = catalog.filter(&CatalogFilter {
            price_range: Some(PriceRange::under_20()),
            ..CatalogFilter::default()
        });
        assert!(under_20.iter().all(|p| p.unit_price() <= dec!(20)));
        assert_eq!(under_20.len(), 4);

        let cheap_cooking = catalog.filter(&CatalogFilter {
            query: Some("mustard".to_owned()),
            category: Some(ProductCategory::Cooking),
            price_range: Some(PriceRange::under_20()),
        });
        assert_eq!(cheap_cooking.len(), 1);
        assert_eq!(cheap_cooking[0].name, "Mustard Oil");
    }

    #[test]
    fn test_price_range_bounds_are_inclusive() {
        assert!(PriceRange::under_20().contains(dec!(20)));
        assert!(PriceRange::from_20_to_50().contains(dec!(20)));
        assert!(PriceRange::from_20_to_50().contains(dec!(50)));
        assert!(!PriceRange::from_20_to_50().contains(dec!(50.01)));
        assert!(PriceRange::over_50().contains(dec!(1000)));
    }

    #[test]
    fn test_recommendations_by_region() {
        let catalog = Catalog::builtin();

        let india = catalog.recommend_for_region("India");
        assert_eq!(india.len(), 3);
        assert!(india.iter().all(|p| matches!(
            p.category,
            ProductCategory::Cooking | ProductCategory::Medicinal
        )));

        let elsewhere = catalog.recommend_for_region("Germany");
        assert_eq!(elsewhere.len(), 3);
        assert!(elsewhere.iter().all(|p| matches!(
            p.category,
            ProductCategory::Cosmetic | ProductCategory::Essential
        )));
    }
}
