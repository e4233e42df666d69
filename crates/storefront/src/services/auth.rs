//! Authentication collaborator.
//!
//! Sign-in, sign-up, and sign-out live in an external identity provider; the
//! storefront core only defines the interface and tracks the signed-in user
//! for display. Cart and checkout never read authentication state: carts are
//! not scoped per user in this design.

use thiserror::Error;

use organic_oils_core::{Email, EmailError, UserId};

/// Minimum password length accepted before hitting the provider.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Invalid credentials (wrong password or unknown user).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Provider-side failure.
    #[error("provider error: {0}")]
    Provider(String),
}

/// The signed-in identity returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Provider-assigned user ID.
    pub id: UserId,
    /// The account email.
    pub email: Email,
}

/// External identity provider.
pub trait AuthProvider {
    /// Sign an existing user in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for a wrong email/password
    /// pair, or `AuthError::Provider` for transport failures.
    fn sign_in(
        &self,
        email: &Email,
        password: &str,
    ) -> impl Future<Output = Result<AuthUser, AuthError>> + Send;

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` if the email is taken, or
    /// `AuthError::Provider` for transport failures.
    fn sign_up(
        &self,
        email: &Email,
        password: &str,
    ) -> impl Future<Output = Result<AuthUser, AuthError>> + Send;

    /// Invalidate the current session with the provider.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Provider` for transport failures.
    fn sign_out(&self) -> impl Future<Output = Result<(), AuthError>> + Send;
}

/// Client-side session state over an [`AuthProvider`].
#[derive(Debug)]
pub struct AuthSession<P: AuthProvider> {
    provider: P,
    user: Option<AuthUser>,
}

impl<P: AuthProvider> AuthSession<P> {
    /// Create a signed-out session.
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self {
            provider,
            user: None,
        }
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn current_user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    /// Sign in and remember the identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if validation or the provider call fails; the
    /// session stays signed out.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<&AuthUser, AuthError> {
        let email = validate_credentials(email, password)?;
        let user = self.provider.sign_in(&email, password).await?;
        tracing::info!(user_id = %user.id, "Signed in");
        Ok(self.user.insert(user))
    }

    /// Register and remember the identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if validation or the provider call fails; the
    /// session stays signed out.
    pub async fn sign_up(&mut self, email: &str, password: &str) -> Result<&AuthUser, AuthError> {
        let email = validate_credentials(email, password)?;
        let user = self.provider.sign_up(&email, password).await?;
        tracing::info!(user_id = %user.id, "Signed up");
        Ok(self.user.insert(user))
    }

    /// Sign out locally and at the provider.
    ///
    /// The local session is cleared even if the provider call fails.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Provider` if the provider call fails.
    pub async fn sign_out(&mut self) -> Result<(), AuthError> {
        self.user = None;
        self.provider.sign_out().await
    }
}

/// Validate credentials before hitting the provider.
///
/// # Errors
///
/// Returns `AuthError::InvalidEmail` or `AuthError::WeakPassword`.
fn validate_credentials(email: &str, password: &str) -> Result<Email, AuthError> {
    let email = Email::parse(email)?;
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(email)
}
