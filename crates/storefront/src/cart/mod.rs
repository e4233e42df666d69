//! Cart store.
//!
//! Owns the session's line items and enforces the cart invariants: at most
//! one line per product ID, and strictly positive quantities for every
//! present line. Every mutation persists a snapshot through the session
//! store; a failed write logs a warning and leaves the in-memory cart
//! authoritative.

pub mod storage;

pub use storage::{JsonFileStore, MemoryStore, SessionStore, StorageError};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use organic_oils_core::{Product, ProductId};

/// Namespace key for the persisted cart snapshot.
pub const STORAGE_KEY: &str = "cart-storage";

/// One catalog product plus the quantity of it held in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Catalog product ID.
    pub id: ProductId,
    /// Display name, copied from the product.
    pub name: String,
    /// Unit price in the base currency.
    pub unit_price: Decimal,
    /// Product image URL.
    pub image: String,
    /// Quantity, always >= 1 while the line exists.
    pub quantity: u32,
}

/// Persisted cart snapshot: a mapping containing the line-item collection.
#[derive(Debug, Serialize, Deserialize)]
struct CartSnapshot {
    items: Vec<CartLineItem>,
}

/// The session's shopping cart.
///
/// Line items keep insertion order, which is the display order. State is
/// restored from the session store on construction and persisted after
/// every mutation.
#[derive(Debug)]
pub struct CartStore<S: SessionStore> {
    items: Vec<CartLineItem>,
    store: S,
}

impl<S: SessionStore> CartStore<S> {
    /// Restore the cart from a prior session, or start empty.
    ///
    /// A missing snapshot starts an empty cart. A snapshot that cannot be
    /// read or parsed also starts an empty cart, with a warning; session
    /// state is convenience data, not a ledger.
    pub fn restore(store: S) -> Self {
        let items = match store.load(STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<CartSnapshot>(&raw) {
                Ok(snapshot) => snapshot.items,
                Err(e) => {
                    tracing::warn!("Discarding unreadable cart snapshot: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to load cart snapshot: {e}");
                Vec::new()
            }
        };

        Self { items, store }
    }

    /// Add one unit of a product.
    ///
    /// If a line with the same product ID exists its quantity is
    /// incremented, otherwise a new line with quantity 1 is appended.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_item(&mut self, product: &Product) {
        if let Some(line) = self.items.iter_mut().find(|l| l.id == product.id) {
            line.quantity += 1;
        } else {
            self.items.push(CartLineItem {
                id: product.id.clone(),
                name: product.name.clone(),
                unit_price: product.unit_price(),
                image: product.image.clone(),
                quantity: 1,
            });
        }
        self.persist();
    }

    /// Remove a line entirely. Absent IDs are a silent no-op: the UI cannot
    /// reference a line that does not exist.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, id: &ProductId) {
        self.items.retain(|l| &l.id != id);
        self.persist();
    }

    /// Set a line's quantity.
    ///
    /// Values of zero or below (negatives are clamped to zero first) remove
    /// the line, exactly as [`Self::remove_item`]. Absent IDs are a no-op.
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) {
        let quantity = quantity.max(0);
        if quantity == 0 {
            self.remove_item(id);
            return;
        }
        if let Some(line) = self.items.iter_mut().find(|l| &l.id == id) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        self.persist();
    }

    /// Empty the cart unconditionally.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Sum of unit price x quantity over all lines, in the base currency.
    ///
    /// Pure function of the current state; no rounding is applied here.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(|l| l.unit_price * Decimal::from(l.quantity))
            .sum()
    }

    /// Line items in display order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines (the cart badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|l| l.quantity).sum()
    }

    /// Access the underlying session store, for assertions in tests.
    #[must_use]
    pub fn session(&self) -> &S {
        &self.store
    }

    /// Write the current snapshot to the session store.
    fn persist(&mut self) {
        let snapshot = CartSnapshot {
            items: self.items.clone(),
        };
        match serde_json::to_string(&snapshot) {
            Ok(raw) => {
                if let Err(e) = self.store.save(STORAGE_KEY, &raw) {
                    tracing::warn!("Failed to persist cart snapshot: {e}");
                }
            }
            Err(e) => tracing::warn!("Failed to serialize cart snapshot: {e}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::dec;

    use crate::catalog::Catalog;

    use super::*;

    fn cart() -> CartStore<MemoryStore> {
        CartStore::restore(MemoryStore::new())
    }

    fn coconut() -> Product {
        Catalog::builtin()
            .get(&ProductId::new("1"))
            .unwrap()
            .clone()
    }

    fn mustard() -> Product {
        Catalog::builtin()
            .get(&ProductId::new("2"))
            .unwrap()
            .clone()
    }

    #[test]
    fn test_add_same_product_aggregates_into_one_line() {
        let mut cart = cart();
        for _ in 0..5 {
            cart.add_item(&coconut());
        }

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_add_distinct_products_keeps_insertion_order() {
        let mut cart = cart();
        cart.add_item(&coconut());
        cart.add_item(&mustard());
        cart.add_item(&coconut());

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.items()[0].name, "Pure Coconut Oil");
        assert_eq!(cart.items()[1].name, "Mustard Oil");
    }

    #[test]
    fn test_remove_absent_line_is_a_no_op() {
        let mut cart = cart();
        cart.add_item(&coconut());
        cart.remove_item(&ProductId::new("999"));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let mut cart = cart();
        cart.add_item(&coconut());
        cart.update_quantity(&ProductId::new("1"), 7);
        assert_eq!(cart.items()[0].quantity, 7);
    }

    #[test]
    fn test_update_quantity_zero_or_below_removes_line() {
        for quantity in [0, -1, -100] {
            let mut cart = cart();
            cart.add_item(&coconut());
            cart.add_item(&mustard());
            cart.update_quantity(&ProductId::new("1"), quantity);

            assert_eq!(cart.len(), 1);
            assert_eq!(cart.items()[0].name, "Mustard Oil");
        }
    }

    #[test]
    fn test_update_quantity_on_absent_line_is_a_no_op() {
        let mut cart = cart();
        cart.add_item(&coconut());
        cart.update_quantity(&ProductId::new("999"), 3);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn test_total_empty_cart_is_zero() {
        assert_eq!(cart().total(), dec!(0));
    }

    #[test]
    fn test_total_single_line() {
        let mut cart = cart();
        cart.add_item(&coconut());
        cart.update_quantity(&ProductId::new("1"), 3);
        // 3 x 24.99
        assert_eq!(cart.total(), dec!(74.97));
    }

    #[test]
    fn test_total_two_distinct_lines() {
        let mut cart = cart();
        cart.add_item(&coconut());
        cart.add_item(&mustard());
        cart.add_item(&mustard());
        // 24.99 + 2 x 19.99
        assert_eq!(cart.total(), dec!(64.97));
    }

    #[test]
    fn test_clear_empties_the_cart() {
        let mut cart = cart();
        cart.add_item(&coconut());
        cart.add_item(&mustard());
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), dec!(0));
    }

    #[test]
    fn test_quantities_stay_positive_after_every_operation() {
        let mut cart = cart();
        cart.add_item(&coconut());
        cart.add_item(&mustard());
        cart.update_quantity(&ProductId::new("1"), 4);
        cart.update_quantity(&ProductId::new("2"), -3);
        cart.add_item(&mustard());

        assert!(cart.items().iter().all(|l| l.quantity >= 1));
        let mut ids: Vec<_> = cart.items().iter().map(|l| l.id.clone()).collect();
        ids.dedup();
        assert_eq!(ids.len(), cart.len(), "line IDs must be unique");
    }

    #[test]
    fn test_persistence_roundtrip() {
        let mut cart = cart();
        cart.add_item(&coconut());
        cart.add_item(&mustard());
        cart.update_quantity(&ProductId::new("2"), 4);

        let original: Vec<_> = cart.items().to_vec();
        let store = cart.session().clone();

        let restored = CartStore::restore(store);
        assert_eq!(restored.items(), original.as_slice());
        assert_eq!(restored.total(), dec!(104.95));
    }

    #[test]
    fn test_restore_discards_corrupt_snapshot() {
        let mut store = MemoryStore::new();
        store.save(STORAGE_KEY, "not json at all").unwrap();

        let cart = CartStore::restore(store);
        assert!(cart.is_empty());
    }
}
