//! Checkout flow.
//!
//! A linear state machine: `Shipping -> Confirmation`, then an explicit
//! reset back to the catalog. Placing an order validates the shipping form,
//! converts the cart total into the selected currency, generates an order
//! number, and makes one best-effort notification attempt. Notification
//! failure never blocks the transition: the order is placed from the user's
//! perspective even when the channel fails.
//!
//! Orders are never persisted. The [`Order`] value exists to drive the
//! confirmation screen and the notification payload, nothing else.

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

use organic_oils_core::{CurrencyCode, Email, OrderId, Price};

use crate::cart::{CartLineItem, CartStore, SessionStore};
use crate::currency;
use crate::services::notify::{OrderNotifier, OrderReceipt, ReceiptLine};

/// Errors that can block the checkout transition.
///
/// Notification failures are deliberately absent: they surface as a
/// [`NotificationOutcome::Failed`] warning on the placed order instead.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart holds no lines; there is nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// A required shipping field is empty.
    #[error("missing shipping field: {0}")]
    MissingField(&'static str),

    /// An order was already placed; reset with continue-shopping first.
    #[error("order already placed")]
    AlreadyPlaced,

    /// No order has been placed yet.
    #[error("no order has been placed")]
    NoOrder,
}

/// Shipping form contents. All fields are free text and must be non-empty
/// (after trimming) before an order can be placed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingInfo {
    pub name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
}

impl ShippingInfo {
    /// Check that every field is filled in.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingField` naming the first empty field.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let fields = [
            ("name", &self.name),
            ("email", &self.email),
            ("address", &self.address),
            ("city", &self.city),
            ("country", &self.country),
            ("postalCode", &self.postal_code),
        ];
        for (label, value) in fields {
            if value.trim().is_empty() {
                return Err(CheckoutError::MissingField(label));
            }
        }
        Ok(())
    }
}

/// Whether the single notification attempt for an order went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// The operator was notified.
    Sent,
    /// The attempt failed; the reason is surfaced as a warning.
    Failed(String),
}

/// A placed order. Exists only for the confirmation screen and the
/// notification payload; there is no server-side ledger.
#[derive(Debug, Clone)]
pub struct Order {
    /// Generated order number; uniqueness is best-effort.
    pub number: OrderId,
    /// Snapshot of the cart lines at submission time, base-currency priced.
    pub lines: Vec<CartLineItem>,
    /// Currency the order was placed in.
    pub currency: CurrencyCode,
    /// Total converted into the selected currency.
    pub total: Price,
    /// Shipping form snapshot.
    pub shipping: ShippingInfo,
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
    /// Outcome of the notification attempt.
    pub notification: NotificationOutcome,
}

/// Source of order numbers.
///
/// Isolated behind a trait so tests can script the sequence and so a
/// deployment that needs guaranteed uniqueness can swap in a stronger
/// generator.
pub trait OrderNumberSource {
    /// Produce the next order number.
    fn next(&mut self) -> OrderId;
}

/// Production order numbers: `ORD-{epoch_millis}-{random in [0, 1000)}`.
///
/// Collisions are improbable but not impossible; with no server-side order
/// store there is nothing to check a stronger ID against, so best-effort is
/// the accepted policy here.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOrderNumbers;

impl OrderNumberSource for SystemOrderNumbers {
    fn next(&mut self) -> OrderId {
        let millis = Utc::now().timestamp_millis();
        let n: u16 = rand::rng().random_range(0..1000);
        OrderId::new(format!("ORD-{millis}-{n}"))
    }
}

/// Checkout state.
#[derive(Debug)]
enum FlowState {
    /// Collecting shipping info and currency selection.
    Shipping,
    /// An order has been placed and is on display.
    Confirmation(Box<Order>),
}

/// The checkout state machine.
///
/// The embedding UI is expected to disable repeat submission while
/// [`CheckoutFlow::place_order`] is in flight (a busy flag, not a queue);
/// the flow itself additionally rejects placement after confirmation.
pub struct CheckoutFlow<N: OrderNotifier, G: OrderNumberSource = SystemOrderNumbers> {
    notifier: N,
    numbers: G,
    order_inbox: Email,
    currency: CurrencyCode,
    state: FlowState,
}

impl<N: OrderNotifier> CheckoutFlow<N> {
    /// Create a flow in the `Shipping` state with USD selected.
    #[must_use]
    pub fn new(notifier: N, order_inbox: Email) -> Self {
        Self::with_numbers(notifier, order_inbox, SystemOrderNumbers)
    }
}

impl<N: OrderNotifier, G: OrderNumberSource> CheckoutFlow<N, G> {
    /// Create a flow with an injected order-number source.
    #[must_use]
    pub fn with_numbers(notifier: N, order_inbox: Email, numbers: G) -> Self {
        Self {
            notifier,
            numbers,
            order_inbox,
            currency: CurrencyCode::default(),
            state: FlowState::Shipping,
        }
    }

    /// The currency currently selected for display and placement.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Select the checkout currency.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::AlreadyPlaced` once an order is on display;
    /// the confirmation totals are frozen.
    pub fn select_currency(&mut self, currency: CurrencyCode) -> Result<(), CheckoutError> {
        if matches!(self.state, FlowState::Confirmation(_)) {
            return Err(CheckoutError::AlreadyPlaced);
        }
        self.currency = currency;
        Ok(())
    }

    /// The cart total converted into the selected currency, unrounded.
    pub fn converted_total<S: SessionStore>(&self, cart: &CartStore<S>) -> Decimal {
        currency::convert(cart.total(), self.currency)
    }

    /// The placed order, if the flow is in `Confirmation`.
    #[must_use]
    pub fn order(&self) -> Option<&Order> {
        match &self.state {
            FlowState::Confirmation(order) => Some(order.as_ref()),
            FlowState::Shipping => None,
        }
    }

    /// Place the order: validate, convert, number, notify, confirm.
    ///
    /// The notification attempt is best-effort; its failure is recorded on
    /// the order as a warning and the transition happens regardless. The
    /// cart is left intact until [`Self::continue_shopping`] resets the
    /// flow, so the confirmation screen can still render the lines.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart`, `CheckoutError::MissingField`, or
    /// `CheckoutError::AlreadyPlaced`. On error the state stays `Shipping`.
    #[instrument(skip(self, cart, shipping), fields(currency = %self.currency))]
    pub async fn place_order<S: SessionStore>(
        &mut self,
        cart: &CartStore<S>,
        shipping: ShippingInfo,
    ) -> Result<&Order, CheckoutError> {
        if matches!(self.state, FlowState::Confirmation(_)) {
            return Err(CheckoutError::AlreadyPlaced);
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        shipping.validate()?;

        let total = self.converted_total(cart);
        let number = self.numbers.next();

        let receipt = OrderReceipt {
            to: self.order_inbox.clone(),
            order_number: number.clone(),
            customer_email: shipping.email.clone(),
            currency: self.currency,
            total,
            lines: cart
                .items()
                .iter()
                .map(|l| ReceiptLine {
                    name: l.name.clone(),
                    quantity: l.quantity,
                    unit_price: currency::convert(l.unit_price, self.currency),
                })
                .collect(),
            message: format!("New order received from {}!", shipping.email),
        };

        let notification = match self.notifier.notify(&receipt).await {
            Ok(()) => {
                tracing::info!(order_number = %number, "Order notification sent");
                NotificationOutcome::Sent
            }
            Err(e) => {
                tracing::warn!(order_number = %number, "Order placed, notification failed: {e}");
                NotificationOutcome::Failed(e.to_string())
            }
        };

        let order = Order {
            number,
            lines: cart.items().to_vec(),
            currency: self.currency,
            total: Price::new(total, self.currency),
            shipping,
            placed_at: Utc::now(),
            notification,
        };

        tracing::info!(order_number = %order.number, total = %order.total.display(), "Order placed");
        self.state = FlowState::Confirmation(Box::new(order));
        match &self.state {
            FlowState::Confirmation(order) => Ok(order.as_ref()),
            FlowState::Shipping => Err(CheckoutError::NoOrder),
        }
    }

    /// Leave the confirmation screen: clear the cart unconditionally and
    /// reset the flow to `Shipping` for a fresh session. No undo.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::NoOrder` if no order is on display.
    #[instrument(skip(self, cart))]
    pub fn continue_shopping<S: SessionStore>(
        &mut self,
        cart: &mut CartStore<S>,
    ) -> Result<Order, CheckoutError> {
        match std::mem::replace(&mut self.state, FlowState::Shipping) {
            FlowState::Confirmation(order) => {
                cart.clear();
                self.currency = CurrencyCode::default();
                Ok(*order)
            }
            FlowState::Shipping => Err(CheckoutError::NoOrder),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::dec;

    use organic_oils_core::ProductId;

    use crate::cart::MemoryStore;
    use crate::catalog::Catalog;
    use crate::services::notify::NotifyError;

    use super::*;

    /// Notifier double that always succeeds.
    struct OkNotifier;

    impl OrderNotifier for OkNotifier {
        async fn notify(&self, _receipt: &OrderReceipt) -> Result<(), NotifyError> {
            Ok(())
        }
    }

    /// Notifier double that always fails with a transport error.
    struct DownNotifier;

    impl OrderNotifier for DownNotifier {
        async fn notify(&self, _receipt: &OrderReceipt) -> Result<(), NotifyError> {
            Err(NotifyError::Transport("relay unreachable".to_owned()))
        }
    }

    /// Scripted order numbers for deterministic assertions.
    struct FixedNumbers(&'static str);

    impl OrderNumberSource for FixedNumbers {
        fn next(&mut self) -> OrderId {
            OrderId::new(self.0)
        }
    }

    fn inbox() -> Email {
        Email::parse("ops@organicoils.example").unwrap()
    }

    fn valid_shipping() -> ShippingInfo {
        ShippingInfo {
            name: "A".to_owned(),
            email: "a@b.com".to_owned(),
            address: "1 St".to_owned(),
            city: "C".to_owned(),
            country: "D".to_owned(),
            postal_code: "E".to_owned(),
        }
    }

    fn stocked_cart() -> CartStore<MemoryStore> {
        let catalog = Catalog::builtin();
        let mut cart = CartStore::restore(MemoryStore::new());
        cart.add_item(catalog.get(&ProductId::new("1")).unwrap());
        cart.add_item(catalog.get(&ProductId::new("1")).unwrap());
        cart.add_item(catalog.get(&ProductId::new("5")).unwrap());
        cart
    }

    #[test]
    fn test_validate_rejects_each_missing_field() {
        let complete = valid_shipping();
        assert!(complete.validate().is_ok());

        let blank_outs: [(&str, fn(&mut ShippingInfo)); 6] = [
            ("name", |s| s.name.clear()),
            ("email", |s| s.email.clear()),
            ("address", |s| s.address.clear()),
            ("city", |s| s.city.clear()),
            ("country", |s| s.country.clear()),
            ("postalCode", |s| s.postal_code.clear()),
        ];

        for (field, blank) in blank_outs {
            let mut shipping = valid_shipping();
            blank(&mut shipping);
            match shipping.validate() {
                Err(CheckoutError::MissingField(missing)) => assert_eq!(missing, field),
                other => panic!("expected MissingField({field}), got {other:?}"),
            }
        }
    }

    #[test]
    fn test_validate_treats_whitespace_as_empty() {
        let mut shipping = valid_shipping();
        shipping.city = "   ".to_owned();
        assert!(matches!(
            shipping.validate(),
            Err(CheckoutError::MissingField("city"))
        ));
    }

    #[tokio::test]
    async fn test_place_order_happy_path() {
        let cart = stocked_cart();
        let mut flow =
            CheckoutFlow::with_numbers(OkNotifier, inbox(), FixedNumbers("ORD-1700000000000-7"));
        flow.select_currency(CurrencyCode::EUR).unwrap();

        let order = flow.place_order(&cart, valid_shipping()).await.unwrap();

        assert_eq!(order.number, OrderId::new("ORD-1700000000000-7"));
        assert_eq!(order.currency, CurrencyCode::EUR);
        // (2 x 24.99 + 18.99) x 0.85
        assert_eq!(order.total.amount.round_dp(2), dec!(58.62));
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.notification, NotificationOutcome::Sent);
        assert!(flow.order().is_some());
    }

    #[tokio::test]
    async fn test_place_order_rejects_empty_cart() {
        let cart: CartStore<MemoryStore> = CartStore::restore(MemoryStore::new());
        let mut flow = CheckoutFlow::new(OkNotifier, inbox());

        let err = flow.place_order(&cart, valid_shipping()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
        assert!(flow.order().is_none());
    }

    #[tokio::test]
    async fn test_place_order_rejects_invalid_shipping_and_stays_in_shipping() {
        let cart = stocked_cart();
        let mut flow = CheckoutFlow::new(OkNotifier, inbox());

        let mut shipping = valid_shipping();
        shipping.email.clear();
        let err = flow.place_order(&cart, shipping).await.unwrap_err();
        assert!(matches!(err, CheckoutError::MissingField("email")));
        assert!(flow.order().is_none());

        // The flow is still usable after the validation failure.
        flow.place_order(&cart, valid_shipping()).await.unwrap();
    }

    #[tokio::test]
    async fn test_notification_failure_still_confirms() {
        let cart = stocked_cart();
        let mut flow = CheckoutFlow::new(DownNotifier, inbox());

        let order = flow.place_order(&cart, valid_shipping()).await.unwrap();
        match &order.notification {
            NotificationOutcome::Failed(reason) => {
                assert!(reason.contains("relay unreachable"));
            }
            NotificationOutcome::Sent => panic!("expected a failed notification"),
        }
        assert!(flow.order().is_some());
    }

    #[tokio::test]
    async fn test_repeat_placement_is_rejected() {
        let cart = stocked_cart();
        let mut flow = CheckoutFlow::new(OkNotifier, inbox());

        flow.place_order(&cart, valid_shipping()).await.unwrap();
        let err = flow.place_order(&cart, valid_shipping()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::AlreadyPlaced));
    }

    #[tokio::test]
    async fn test_continue_shopping_clears_cart_and_resets() {
        let mut cart = stocked_cart();
        let mut flow = CheckoutFlow::new(OkNotifier, inbox());
        flow.select_currency(CurrencyCode::GBP).unwrap();

        flow.place_order(&cart, valid_shipping()).await.unwrap();
        assert!(!cart.is_empty());

        let order = flow.continue_shopping(&mut cart).unwrap();
        assert_eq!(order.currency, CurrencyCode::GBP);
        assert!(cart.is_empty());
        assert!(flow.order().is_none());
        assert_eq!(flow.currency(), CurrencyCode::USD);

        // A second reset has nothing to return.
        assert!(matches!(
            flow.continue_shopping(&mut cart),
            Err(CheckoutError::NoOrder)
        ));
    }

    #[tokio::test]
    async fn test_currency_is_frozen_after_placement() {
        let cart = stocked_cart();
        let mut flow = CheckoutFlow::new(OkNotifier, inbox());
        flow.place_order(&cart, valid_shipping()).await.unwrap();

        assert!(matches!(
            flow.select_currency(CurrencyCode::INR),
            Err(CheckoutError::AlreadyPlaced)
        ));
    }

    #[test]
    fn test_system_order_numbers_format() {
        let mut source = SystemOrderNumbers;
        let number = source.next();
        let number = number.as_str();

        let mut parts = number.split('-');
        assert_eq!(parts.next(), Some("ORD"));
        let millis: i64 = parts.next().unwrap().parse().unwrap();
        assert!(millis > 0);
        let random: u16 = parts.next().unwrap().parse().unwrap();
        assert!(random < 1000);
        assert_eq!(parts.next(), None);
    }
}
