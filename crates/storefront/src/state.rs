//! Application root.
//!
//! [`App`] is the explicit, dependency-injected container that replaces the
//! original global stores: the catalog, the cart, and the checkout flow live
//! here and collaborators are passed in at construction. Because every
//! dependency is injected, tests can run any number of independent app
//! instances side by side.
//!
//! The core is single-threaded and event-driven: all cart and checkout
//! operations run synchronously on the calling task, so the container hands
//! out plain `&mut` access instead of wrapping stores in locks.

use organic_oils_core::{Email, Product, ProductId};

use crate::cart::{CartStore, JsonFileStore, SessionStore};
use crate::catalog::Catalog;
use crate::chat::ChatWidget;
use crate::checkout::{CheckoutFlow, Order, ShippingInfo};
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::services::notify::{OrderNotifier, RateLimited, SmtpNotifier};

/// The application root owning the storefront's client-local state.
pub struct App<S: SessionStore, N: OrderNotifier> {
    catalog: Catalog,
    cart: CartStore<S>,
    checkout: CheckoutFlow<N>,
    chat_reply_delay: std::time::Duration,
}

/// The production wiring: file-backed session storage and rate-limited SMTP
/// notifications.
pub type ProductionApp = App<JsonFileStore, RateLimited<SmtpNotifier>>;

impl ProductionApp {
    /// Wire up a production app from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP transport cannot be configured.
    pub fn from_config(config: &StorefrontConfig, catalog: Catalog) -> Result<Self> {
        let store = JsonFileStore::new(&config.storage_dir);
        let notifier = RateLimited::new(SmtpNotifier::new(&config.smtp)?, config.notify_interval);
        let mut app = Self::new(catalog, store, notifier, config.order_inbox.clone());
        app.chat_reply_delay = config.chat_reply_delay;
        Ok(app)
    }
}

impl<S: SessionStore, N: OrderNotifier> App<S, N> {
    /// Build an app from injected collaborators.
    ///
    /// The cart restores itself from the session store; the checkout flow
    /// starts in `Shipping` with the base currency selected.
    #[must_use]
    pub fn new(catalog: Catalog, session: S, notifier: N, order_inbox: Email) -> Self {
        Self {
            catalog,
            cart: CartStore::restore(session),
            checkout: CheckoutFlow::new(notifier, order_inbox),
            chat_reply_delay: std::time::Duration::from_millis(500),
        }
    }

    /// The product catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The cart, read-only.
    #[must_use]
    pub const fn cart(&self) -> &CartStore<S> {
        &self.cart
    }

    /// The cart, for mutation.
    pub const fn cart_mut(&mut self) -> &mut CartStore<S> {
        &mut self.cart
    }

    /// The checkout flow, read-only.
    #[must_use]
    pub const fn checkout(&self) -> &CheckoutFlow<N> {
        &self.checkout
    }

    /// The checkout flow, for currency selection.
    pub const fn checkout_mut(&mut self) -> &mut CheckoutFlow<N> {
        &mut self.checkout
    }

    /// Add one unit of a catalog product to the cart.
    ///
    /// Returns the product on success; `None` if the ID is not in the
    /// catalog (the UI cannot normally construct such a reference).
    pub fn add_to_cart(&mut self, id: &ProductId) -> Option<&Product> {
        let product = self.catalog.get(id)?;
        self.cart.add_item(product);
        Some(product)
    }

    /// Place the order for the current cart.
    ///
    /// # Errors
    ///
    /// Returns the checkout validation errors; notification failures are
    /// recorded on the returned order, not raised here.
    pub async fn place_order(&mut self, shipping: ShippingInfo) -> Result<&Order> {
        Ok(self.checkout.place_order(&self.cart, shipping).await?)
    }

    /// Leave the confirmation screen, clearing the cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::NoOrder` if no order is on display.
    pub fn continue_shopping(&mut self) -> Result<Order> {
        Ok(self.checkout.continue_shopping(&mut self.cart)?)
    }

    /// Open a chat widget over the catalog.
    ///
    /// Each widget is independent; closing it cancels its pending replies
    /// without touching the rest of the app.
    #[must_use]
    pub fn open_chat(&self) -> ChatWidget {
        ChatWidget::with_matcher(
            crate::chat::ResponseMatcher::new(self.catalog.clone()),
            self.chat_reply_delay,
        )
    }
}
