//! Cookie-backed session store.
//!
//! The whole session lives in the cookie: a key/value bag serialized as JSON,
//! base64url-encoded, and authenticated with HMAC-SHA256 under the configured
//! secret. The server keeps no per-session state, so a session survives
//! exactly as long as its cookie does.
//!
//! Fixed keys: `token` holds the authenticated user id, `error` holds a
//! transient login-failure message consumed on the next page load. A bag with
//! no `token` is an anonymous session; it never holds more than one.

use anyhow::{Context, Result, anyhow};
use axum::http::{HeaderMap, HeaderValue, header::COOKIE};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use std::collections::BTreeMap;
use tracing::debug;

pub(crate) const SESSION_COOKIE_NAME: &str = "ensaluti_session";

/// Session key holding the authenticated user identifier.
pub(crate) const SESSION_KEY_TOKEN: &str = "token";

/// Session key holding a transient error message for the login page.
pub(crate) const SESSION_KEY_ERROR: &str = "error";

/// Cookie lifetime when "remember me" is checked: 7 days.
pub(crate) const REMEMBER_MAX_AGE_SECONDS: i64 = 60 * 60 * 24 * 7;

type HmacSha256 = Hmac<Sha256>;

/// Per-request key/value session bag.
///
/// Loaded from the request cookie, mutated by handlers, and committed back
/// into a `Set-Cookie` header. Missing or tampered cookies load as an empty
/// (anonymous) bag.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Session {
    values: BTreeMap<String, String>,
}

impl Session {
    pub(crate) fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub(crate) fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    /// Remove and return a value, used for one-shot error messages.
    pub(crate) fn take(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Commit-time cookie attributes.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct CommitOptions {
    /// `Max-Age` in seconds; `None` leaves the cookie session-scoped.
    pub(crate) max_age: Option<i64>,
}

/// Serializes sessions to signed cookies and back.
pub struct SessionStore {
    secret: SecretString,
    secure: bool,
}

impl SessionStore {
    pub(crate) fn new(secret: SecretString, secure: bool) -> Self {
        Self { secret, secure }
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| anyhow!("failed to key session MAC: {e}"))
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>> {
        let mut mac = self.mac()?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    fn verify(&self, payload: &[u8], tag: &[u8]) -> bool {
        let Ok(mut mac) = self.mac() else {
            return false;
        };
        mac.update(payload);
        // Constant-time comparison through the Mac trait.
        mac.verify_slice(tag).is_ok()
    }

    /// Load the session from the request's cookie header.
    ///
    /// Missing, malformed, or tampered cookies yield an empty session rather
    /// than an error; an unauthenticated request is not a fault.
    pub(crate) fn load(&self, headers: &HeaderMap) -> Session {
        let Some(raw) = extract_session_cookie(headers) else {
            return Session::default();
        };

        let Some((payload_b64, tag_b64)) = raw.split_once('.') else {
            debug!("session cookie missing signature separator");
            return Session::default();
        };

        let (Ok(payload), Ok(tag)) = (
            URL_SAFE_NO_PAD.decode(payload_b64),
            URL_SAFE_NO_PAD.decode(tag_b64),
        ) else {
            debug!("session cookie is not valid base64url");
            return Session::default();
        };

        if !self.verify(&payload, &tag) {
            debug!("session cookie failed signature verification");
            return Session::default();
        }

        match serde_json::from_slice::<BTreeMap<String, String>>(&payload) {
            Ok(values) => Session { values },
            Err(err) => {
                debug!("session cookie payload is not valid JSON: {err}");
                Session::default()
            }
        }
    }

    /// Serialize the session into a `Set-Cookie` header value.
    ///
    /// # Errors
    /// Returns an error if serialization or signing fails.
    pub(crate) fn commit(&self, session: &Session, options: CommitOptions) -> Result<HeaderValue> {
        let payload = serde_json::to_vec(&session.values).context("failed to encode session")?;
        let tag = self.sign(&payload)?;

        let mut cookie = format!(
            "{SESSION_COOKIE_NAME}={}.{}; Path=/; HttpOnly; SameSite=Lax",
            URL_SAFE_NO_PAD.encode(&payload),
            URL_SAFE_NO_PAD.encode(&tag)
        );
        if let Some(max_age) = options.max_age {
            cookie.push_str(&format!("; Max-Age={max_age}"));
        }
        if self.secure {
            cookie.push_str("; Secure");
        }

        HeaderValue::from_str(&cookie).context("failed to build session cookie header")
    }

    /// Build a `Set-Cookie` header that clears the session.
    pub(crate) fn clear(&self) -> HeaderValue {
        if self.secure {
            HeaderValue::from_static(
                "ensaluti_session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; Secure",
            )
        } else {
            HeaderValue::from_static("ensaluti_session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
        }
    }
}

fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        // Pairs without a value (bare flags) are skipped, not fatal.
        let Some((key, val)) = pair.trim().split_once('=') else {
            continue;
        };
        if key.trim() == SESSION_COOKIE_NAME {
            return Some(val.trim().to_string());
        }
    }
    None
}
