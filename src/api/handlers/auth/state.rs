//! Auth configuration and shared request state.

use secrecy::SecretString;

use super::session::SessionStore;

#[derive(Debug)]
pub struct AuthConfig {
    session_secret: SecretString,
    base_url: String,
}

impl AuthConfig {
    #[must_use]
    pub fn new(session_secret: SecretString, base_url: String) -> Self {
        Self {
            session_secret,
            base_url,
        }
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Only mark cookies `Secure` when the service is served over HTTPS.
    pub(super) fn session_cookie_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

/// Shared state injected into the auth handlers.
pub struct AuthState {
    config: AuthConfig,
    sessions: SessionStore,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        let sessions = SessionStore::new(
            config.session_secret.clone(),
            config.session_cookie_secure(),
        );
        Self { config, sessions }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub(crate) fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        SecretString::from("0123456789abcdef0123456789abcdef".to_string())
    }

    #[test]
    fn secure_cookie_follows_base_url_scheme() {
        let https = AuthConfig::new(secret(), "https://login.example.com".to_string());
        assert!(https.session_cookie_secure());

        let http = AuthConfig::new(secret(), "http://localhost:8080".to_string());
        assert!(!http.session_cookie_secure());
    }

    #[test]
    fn auth_state_exposes_config() {
        let state = AuthState::new(AuthConfig::new(secret(), "http://localhost:8080".to_string()));
        assert_eq!(state.config().base_url(), "http://localhost:8080");
    }
}
