//! Order-notification collaborator.
//!
//! The checkout flow makes exactly one best-effort notification attempt per
//! placed order. Delivery goes to the operator inbox over SMTP via lettre,
//! with Askama-rendered text and HTML bodies. Successive attempts must be
//! spaced by a minimum interval; an attempt inside the window fails
//! immediately with [`NotifyError::RateLimited`] instead of being queued or
//! retried.

use std::time::Duration;

use askama::Template;
use governor::clock::{Clock, DefaultClock};
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use thiserror::Error;

use organic_oils_core::{CurrencyCode, Email, OrderId};

use crate::config::SmtpConfig;
use crate::currency;

/// Errors that can occur when sending an order notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// A notification was attempted inside the minimum-interval window.
    #[error("please wait a moment before sending another notification")]
    RateLimited,

    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build the email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Any other transport failure.
    #[error("transport error: {0}")]
    Transport(String),
}

/// One line of an order receipt, priced in the order's selected currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    /// Product display name.
    pub name: String,
    /// Units ordered.
    pub quantity: u32,
    /// Converted unit price, unrounded.
    pub unit_price: Decimal,
}

/// The notification payload for a placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    /// Operator inbox the notification is addressed to.
    pub to: Email,
    /// Generated order number.
    pub order_number: OrderId,
    /// Customer email from the shipping form (free text, display only).
    pub customer_email: String,
    /// Currency the order was placed in.
    pub currency: CurrencyCode,
    /// Converted order total, unrounded.
    pub total: Decimal,
    /// Per-line breakdown in the selected currency.
    pub lines: Vec<ReceiptLine>,
    /// Free-text message for the operator.
    pub message: String,
}

impl OrderReceipt {
    /// Total formatted for display, e.g. `"EUR 85.00"`.
    #[must_use]
    pub fn formatted_total(&self) -> String {
        currency::format_amount(self.total, self.currency)
    }

    /// Concatenated item summary, e.g. `"Pure Coconut Oil x2, Neem Oil x1"`.
    #[must_use]
    pub fn item_summary(&self) -> String {
        self.lines
            .iter()
            .map(|l| format!("{} x{}", l.name, l.quantity))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Accepts an order receipt and delivers it, best-effort.
pub trait OrderNotifier {
    /// Make one delivery attempt for the receipt.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError` when the attempt is rate limited or the
    /// transport fails. Callers treat every failure as non-fatal.
    fn notify(
        &self,
        receipt: &OrderReceipt,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

// =============================================================================
// Rate limiting
// =============================================================================

type Gate<C> = RateLimiter<NotKeyed, InMemoryState, C, NoOpMiddleware<<C as Clock>::Instant>>;

/// Wraps a notifier with the minimum-interval policy.
///
/// The window is measured between attempts on this instance, successful or
/// not. The gate guards the notifier, not the process: independent app
/// instances do not contend.
pub struct RateLimited<N, C: Clock = DefaultClock> {
    inner: N,
    gate: Gate<C>,
}

impl<N> RateLimited<N> {
    /// Gate `inner` so attempts are spaced by at least `min_interval`.
    ///
    /// # Panics
    ///
    /// Panics if `min_interval` is zero; configuration loading rejects zero
    /// intervals before they reach this constructor.
    #[must_use]
    pub fn new(inner: N, min_interval: Duration) -> Self {
        let quota = Quota::with_period(min_interval)
            .expect("minimum notification interval must be non-zero");
        Self {
            inner,
            gate: RateLimiter::direct(quota),
        }
    }
}

impl<N, C: Clock> RateLimited<N, C> {
    /// Like [`RateLimited::new`], with an injected clock so tests can drive
    /// time deterministically.
    ///
    /// # Panics
    ///
    /// Panics if `min_interval` is zero.
    #[must_use]
    pub fn with_clock(inner: N, min_interval: Duration, clock: C) -> Self {
        let quota = Quota::with_period(min_interval)
            .expect("minimum notification interval must be non-zero");
        Self {
            inner,
            gate: RateLimiter::direct_with_clock(quota, clock),
        }
    }
}

impl<N: OrderNotifier + Sync, C: Clock + Sync> OrderNotifier for RateLimited<N, C> {
    async fn notify(&self, receipt: &OrderReceipt) -> Result<(), NotifyError> {
        if self.gate.check().is_err() {
            tracing::warn!(order_number = %receipt.order_number, "Notification rate limited");
            return Err(NotifyError::RateLimited);
        }
        self.inner.notify(receipt).await
    }
}

// =============================================================================
// SMTP delivery
// =============================================================================

/// Formatted receipt line handed to the email templates.
struct TemplateLine {
    name: String,
    quantity: u32,
    unit_price: String,
}

/// Plain text template for the order notification.
#[derive(Template)]
#[template(path = "email/order_confirmation.txt")]
struct OrderConfirmationText<'a> {
    order_number: &'a str,
    customer_email: &'a str,
    total: &'a str,
    lines: &'a [TemplateLine],
    message: &'a str,
}

/// HTML template for the order notification.
#[derive(Template)]
#[template(path = "email/order_confirmation.html")]
struct OrderConfirmationHtml<'a> {
    order_number: &'a str,
    customer_email: &'a str,
    total: &'a str,
    lines: &'a [TemplateLine],
    message: &'a str,
}

/// SMTP notifier for order confirmations.
#[derive(Clone)]
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpNotifier {
    /// Create an SMTP notifier from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &SmtpConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), NotifyError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| NotifyError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| NotifyError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Notification sent");
        Ok(())
    }
}

impl OrderNotifier for SmtpNotifier {
    async fn notify(&self, receipt: &OrderReceipt) -> Result<(), NotifyError> {
        let lines: Vec<TemplateLine> = receipt
            .lines
            .iter()
            .map(|l| TemplateLine {
                name: l.name.clone(),
                quantity: l.quantity,
                unit_price: currency::format_amount(l.unit_price, receipt.currency),
            })
            .collect();

        let order_number = receipt.order_number.as_str();
        let total = receipt.formatted_total();

        let text = OrderConfirmationText {
            order_number,
            customer_email: &receipt.customer_email,
            total: &total,
            lines: &lines,
            message: &receipt.message,
        }
        .render()?;
        let html = OrderConfirmationHtml {
            order_number,
            customer_email: &receipt.customer_email,
            total: &total,
            lines: &lines,
            message: &receipt.message,
        }
        .render()?;

        let subject = format!("New order {order_number}");
        self.send_multipart_email(receipt.to.as_str(), &subject, &text, &html)
            .await
    }
}
