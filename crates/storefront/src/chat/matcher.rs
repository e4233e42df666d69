//! Rule-based response matcher for the chat assistant.
//!
//! Pure text-in/text-out classification over the catalog. Rules run in a
//! fixed order and the first match wins; everything is case-insensitive.
//! Randomized picks go through an injected RNG so tests can script them.

use std::sync::LazyLock;

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use regex::Regex;

use crate::catalog::Catalog;

/// Opening lines; the first one seeds new transcripts.
pub const GREETINGS: [&str; 3] = [
    "Hello! I'm your OrganicOils assistant. How can I help you today?",
    "Welcome to OrganicOils! Looking for specific oil recommendations?",
    "Hi there! I can help you find the perfect organic oil for your needs.",
];

/// Closing lines.
pub const FAREWELLS: [&str; 3] = [
    "Thank you for chatting! Feel free to return if you have more questions.",
    "Have a great day! Don't hesitate to ask if you need anything else.",
    "Goodbye! Remember, we're here 24/7 to assist you.",
];

/// Reply to a help request.
pub const HELP: &str = "I can help you with:\n- Product information and prices\n- Shipping details\n- Product recommendations\n- Usage guidelines\nWhat would you like to know?";

/// Reply to shipping and delivery questions.
pub const SHIPPING: &str = "We offer worldwide shipping! Delivery times:\n- India: 2-3 business days\n- Asia: 3-5 business days\n- Europe & USA: 5-7 business days\n- Rest of World: 7-10 business days";

/// Reply to quality and certification questions.
pub const QUALITY: &str = "All our oils are certified organic and undergo strict quality testing. Each batch is tested for purity and authenticity.";

/// Fallback replies for anything unmatched.
pub const DEFAULTS: [&str; 2] = [
    "I'm not sure I understood that. Could you please rephrase your question?",
    "I'd be happy to help, but could you provide more details about what you're looking for?",
];

const RECOMMEND_COOKING: &str = "For cooking, I recommend our Mustard Oil from Bengal or Coconut Oil from Kerala. Both are excellent for high-temperature cooking and add authentic flavor to dishes.";
const RECOMMEND_SKIN: &str = "For skincare, our Almond Oil and Neem Oil are excellent choices. Almond Oil is great for gentle moisturizing, while Neem Oil has natural antibacterial properties.";
const RECOMMEND_HAIR: &str = "For hair care, I highly recommend our Coconut Oil or Castor Oil. Both are excellent for promoting hair growth and maintaining scalp health.";

static GREETING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(hi|hello|hey|greetings)").expect("greeting pattern is valid")
});
static FAREWELL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(bye|goodbye|see you|thanks|thank you)").expect("farewell pattern is valid")
});
static HELP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(help|what can you do|assist)").expect("help pattern is valid")
});

/// Maps free-text input to a canned response or a catalog lookup.
pub struct ResponseMatcher<R: Rng = StdRng> {
    catalog: Catalog,
    rng: R,
}

impl ResponseMatcher<StdRng> {
    /// Matcher over the given catalog with an OS-seeded RNG.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        use rand::SeedableRng;
        Self::with_rng(catalog, StdRng::from_os_rng())
    }
}

impl<R: Rng> ResponseMatcher<R> {
    /// Matcher with an injected RNG, for deterministic tests.
    #[must_use]
    pub const fn with_rng(catalog: Catalog, rng: R) -> Self {
        Self { catalog, rng }
    }

    /// Produce the assistant's reply for one user message.
    ///
    /// Classification order, first match wins:
    /// greeting, farewell, help, shipping keywords, quality keywords,
    /// catalog product match, recommendation request, fallback.
    pub fn respond(&mut self, input: &str) -> String {
        let query = input.to_lowercase();

        if GREETING_RE.is_match(&query) {
            return self.pick(&GREETINGS);
        }

        if FAREWELL_RE.is_match(&query) {
            return self.pick(&FAREWELLS);
        }

        if HELP_RE.is_match(&query) {
            return HELP.to_owned();
        }

        if query.contains("shipping") || query.contains("delivery") || query.contains("time") {
            return SHIPPING.to_owned();
        }

        if query.contains("quality") || query.contains("organic") || query.contains("certification")
        {
            return QUALITY.to_owned();
        }

        if let Some(product) = self.catalog.find_matching(&query) {
            let best_for = product
                .benefits
                .first()
                .map_or_else(String::new, |b| b.to_lowercase());
            return format!(
                "{}:\nPrice: ${:.2}\nDescription: {}\nOrigin: {}\nBenefits: {}\nBest For: This oil is particularly popular in {} and is excellent for {}.",
                product.name,
                product.unit_price(),
                product.description,
                product.origin,
                product.benefits.join(", "),
                product.origin,
                best_for,
            );
        }

        if query.contains("recommend") || query.contains("suggestion") {
            if query.contains("cooking") {
                return RECOMMEND_COOKING.to_owned();
            }
            if query.contains("skin") || query.contains("face") {
                return RECOMMEND_SKIN.to_owned();
            }
            if query.contains("hair") {
                return RECOMMEND_HAIR.to_owned();
            }
        }

        self.pick(&DEFAULTS)
    }

    fn pick(&mut self, set: &[&str]) -> String {
        set.choose(&mut self.rng)
            .copied()
            .unwrap_or(DEFAULTS[0])
            .to_owned()
    }
}
