//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ORGANIC_OILS_SMTP_HOST` - SMTP relay host for order notifications
//! - `ORGANIC_OILS_SMTP_USERNAME` - SMTP username
//! - `ORGANIC_OILS_SMTP_PASSWORD` - SMTP password
//! - `ORGANIC_OILS_FROM_ADDRESS` - From address for outbound mail
//! - `ORGANIC_OILS_ORDER_INBOX` - Operator address that receives order
//!   notifications
//!
//! ## Optional
//! - `ORGANIC_OILS_SMTP_PORT` - SMTP port (default: 587)
//! - `ORGANIC_OILS_STORAGE_DIR` - Directory for session persistence
//!   (default: `storage`)
//! - `ORGANIC_OILS_NOTIFY_INTERVAL_MS` - Minimum interval between
//!   notification attempts (default: 1000)
//! - `ORGANIC_OILS_CHAT_DELAY_MS` - Simulated chat reply delay
//!   (default: 500)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use organic_oils_core::Email;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// SMTP settings for the notification collaborator
    pub smtp: SmtpConfig,
    /// Operator address that receives order-confirmation notifications
    pub order_inbox: Email,
    /// Directory where session state (the cart snapshot) is persisted
    pub storage_dir: PathBuf,
    /// Minimum spacing between successive notification attempts
    pub notify_interval: Duration,
    /// Delay before the chat assistant's reply is appended
    pub chat_reply_delay: Duration,
}

/// SMTP transport configuration.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct SmtpConfig {
    /// SMTP relay host
    pub host: String,
    /// SMTP port
    pub port: u16,
    /// SMTP username
    pub username: String,
    /// SMTP password
    pub password: SecretString,
    /// From address for outbound mail
    pub from_address: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let smtp = SmtpConfig::from_env()?;

        let order_inbox = get_required_env("ORGANIC_OILS_ORDER_INBOX")?;
        let order_inbox = Email::parse(&order_inbox).map_err(|e| {
            ConfigError::InvalidEnvVar("ORGANIC_OILS_ORDER_INBOX".to_string(), e.to_string())
        })?;

        let storage_dir =
            PathBuf::from(get_env_or_default("ORGANIC_OILS_STORAGE_DIR", "storage"));

        let notify_interval =
            get_duration_ms("ORGANIC_OILS_NOTIFY_INTERVAL_MS", 1000)?;
        let chat_reply_delay = get_duration_ms("ORGANIC_OILS_CHAT_DELAY_MS", 500)?;

        Ok(Self {
            smtp,
            order_inbox,
            storage_dir,
            notify_interval,
            chat_reply_delay,
        })
    }
}

impl SmtpConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let port = get_env_or_default("ORGANIC_OILS_SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ORGANIC_OILS_SMTP_PORT".to_string(), e.to_string())
            })?;

        Ok(Self {
            host: get_required_env("ORGANIC_OILS_SMTP_HOST")?,
            port,
            username: get_required_env("ORGANIC_OILS_SMTP_USERNAME")?,
            password: SecretString::from(get_required_env("ORGANIC_OILS_SMTP_PASSWORD")?),
            from_address: get_required_env("ORGANIC_OILS_FROM_ADDRESS")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a millisecond duration variable; zero is rejected.
fn get_duration_ms(key: &str, default_ms: u64) -> Result<Duration, ConfigError> {
    let raw = get_env_or_default(key, &default_ms.to_string());
    let ms = raw
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if ms == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
#[allow(unsafe_code, clippy::unwrap_used)]
mod tests {
    use super::*;

    // Environment variables are process-global, so everything touching them
    // lives in a single test to avoid racing parallel tests.
    #[test]
    fn test_from_env() {
        let vars = [
            ("ORGANIC_OILS_SMTP_HOST", "smtp.example.com"),
            ("ORGANIC_OILS_SMTP_USERNAME", "mailer"),
            ("ORGANIC_OILS_SMTP_PASSWORD", "hunter2-hunter2"),
            ("ORGANIC_OILS_FROM_ADDRESS", "orders@organicoils.example"),
            ("ORGANIC_OILS_ORDER_INBOX", "ops@organicoils.example"),
        ];
        for (key, value) in vars {
            unsafe { std::env::set_var(key, value) };
        }

        let config = StorefrontConfig::from_env().unwrap();
        assert_eq!(config.smtp.host, "smtp.example.com");
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.order_inbox.as_str(), "ops@organicoils.example");
        assert_eq!(config.storage_dir, PathBuf::from("storage"));
        assert_eq!(config.notify_interval, Duration::from_millis(1000));
        assert_eq!(config.chat_reply_delay, Duration::from_millis(500));

        // Debug output must not leak the SMTP password.
        let debug = format!("{:?}", config.smtp);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));

        // Zero intervals are rejected.
        unsafe { std::env::set_var("ORGANIC_OILS_NOTIFY_INTERVAL_MS", "0") };
        assert!(matches!(
            StorefrontConfig::from_env(),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        unsafe { std::env::remove_var("ORGANIC_OILS_NOTIFY_INTERVAL_MS") };

        // Missing required variable is reported by name.
        unsafe { std::env::remove_var("ORGANIC_OILS_SMTP_HOST") };
        match StorefrontConfig::from_env() {
            Err(ConfigError::MissingEnvVar(key)) => {
                assert_eq!(key, "ORGANIC_OILS_SMTP_HOST");
            }
            other => panic!("expected MissingEnvVar, got {other:?}"),
        }
    }
}
