//! Chat widget.
//!
//! The assistant keeps an append-only transcript for display and replies to
//! each user message after a short simulated delay. The deferred reply is a
//! scheduled task tied to the widget's lifetime: closing the widget cancels
//! any pending reply, so nothing is ever written into a transcript the user
//! has discarded.

pub mod matcher;

pub use matcher::ResponseMatcher;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::catalog::Catalog;

/// Who sent a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A message in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the sender.
    pub role: ChatRole,
    /// Message text.
    pub text: String,
    /// When the message was appended.
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    fn now(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }
}

/// The chat widget: transcript plus matcher plus reply scheduling.
///
/// Requires a tokio runtime context: replies are appended by spawned tasks
/// after [`ChatWidget::reply_delay`] elapses.
pub struct ChatWidget<R: Rng = StdRng> {
    transcript: Arc<Mutex<Vec<ChatMessage>>>,
    matcher: ResponseMatcher<R>,
    reply_delay: Duration,
    pending: Vec<JoinHandle<()>>,
}

impl ChatWidget<StdRng> {
    /// Open a widget over the catalog with the default 500ms reply delay.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self::with_matcher(ResponseMatcher::new(catalog), Duration::from_millis(500))
    }
}

impl<R: Rng> ChatWidget<R> {
    /// Open a widget with an injected matcher and reply delay.
    ///
    /// The transcript starts seeded with the assistant's opening line.
    #[must_use]
    pub fn with_matcher(matcher: ResponseMatcher<R>, reply_delay: Duration) -> Self {
        let seed = ChatMessage::now(ChatRole::Assistant, matcher::GREETINGS[0]);
        Self {
            transcript: Arc::new(Mutex::new(vec![seed])),
            matcher,
            reply_delay,
            pending: Vec::new(),
        }
    }

    /// The configured reply delay.
    #[must_use]
    pub const fn reply_delay(&self) -> Duration {
        self.reply_delay
    }

    /// A snapshot of the transcript in append order.
    ///
    /// # Panics
    ///
    /// Panics if a reply task panicked while holding the transcript lock,
    /// which would already be a bug.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.transcript.lock().unwrap().clone()
    }

    /// Append a user message and schedule the assistant's reply.
    ///
    /// Blank input is ignored. The reply is computed immediately but lands
    /// in the transcript only after the configured delay, mirroring the
    /// "assistant is typing" pause of the original widget.
    pub fn send(&mut self, input: &str) {
        let input = input.trim();
        if input.is_empty() {
            return;
        }

        {
            #[allow(clippy::unwrap_used)]
            let mut transcript = self.transcript.lock().unwrap();
            transcript.push(ChatMessage::now(ChatRole::User, input));
        }

        let reply = self.matcher.respond(input);
        tracing::debug!(chars = reply.len(), "Scheduled assistant reply");

        let transcript = Arc::clone(&self.transcript);
        let delay = self.reply_delay;
        self.pending.retain(|task| !task.is_finished());
        self.pending.push(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            #[allow(clippy::unwrap_used)]
            let mut transcript = transcript.lock().unwrap();
            transcript.push(ChatMessage::now(ChatRole::Assistant, reply));
        }));
    }

    /// Close the widget, cancelling any pending replies.
    pub fn close(&mut self) {
        for task in self.pending.drain(..) {
            task.abort();
        }
    }
}

impl<R: Rng> Drop for ChatWidget<R> {
    fn drop(&mut self) {
        self.close();
    }
}
