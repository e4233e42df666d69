//! Unified error type for the storefront core.
//!
//! Module-level errors stay specific; `AppError` exists so the embedding
//! shell can match one type when surfacing failures to the user. No error
//! here is fatal to the process: every failure path yields a defined state.

use thiserror::Error;

use crate::cart::StorageError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::services::auth::AuthError;
use crate::services::notify::NotifyError;

/// Application-level error type for the storefront core.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Session storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A checkout transition was rejected.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// A notification attempt failed.
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// An authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// SMTP transport could not be configured.
    #[error("SMTP setup error: {0}")]
    SmtpSetup(#[from] lettre::transport::smtp::Error),
}

impl AppError {
    /// Whether the failure only warrants a warning toast: the user's action
    /// still completed.
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::Notify(_) | Self::Storage(_))
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
