//! Credential verification service.
//!
//! An explicitly constructed instance injected into the handlers, rather than
//! a module-level singleton, so tests and future strategies can swap it out.

use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::error::AuthError;
use super::password::verify_password;
use super::storage::lookup_user;

/// Verifies username/password credentials against stored user records.
#[derive(Debug, Default)]
pub struct Authenticator;

impl Authenticator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Verify credentials and return the user's identifier.
    ///
    /// Unknown usernames and wrong passwords both fail with
    /// [`AuthError::InvalidCredentials`]; callers cannot tell which, so the
    /// response never leaks whether an account exists. No side effects beyond
    /// the lookup.
    ///
    /// # Errors
    /// `InvalidInput` for empty fields, `InvalidCredentials` on mismatch,
    /// `Internal` on persistence failure.
    pub async fn verify(
        &self,
        pool: &PgPool,
        username: &str,
        password: &str,
    ) -> Result<Uuid, AuthError> {
        if username.is_empty() {
            return Err(AuthError::InvalidInput("username must not be empty"));
        }
        if password.is_empty() {
            return Err(AuthError::InvalidInput("password must not be empty"));
        }

        let Some(user) = lookup_user(pool, username).await? else {
            debug!("login attempt for unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(&user.password_hash, password) {
            debug!("login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user.id)
    }
}
