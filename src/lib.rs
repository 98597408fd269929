//! # Ensaluti (Login & Signup Service)
//!
//! `ensaluti` is a small username/password authentication service for
//! server-rendered applications. A single shared form endpoint handles both
//! login and signup, disambiguated by an `intent` field.
//!
//! ## Sessions
//!
//! Session state lives entirely in a signed cookie: a key/value bag serialized
//! as JSON, base64url-encoded, and authenticated with HMAC-SHA256. The server
//! keeps no per-session state; a session either carries no authenticated
//! identifier (anonymous) or exactly one user id under the `token` key.
//!
//! - **Remember me:** checking the box extends the cookie to a 7-day
//!   `Max-Age`; otherwise the cookie is session-scoped.
//! - **Login failures:** the generic message "Invalid Username or Password" is
//!   stashed in the session and surfaced on the next `GET /login`. Unknown
//!   usernames and wrong passwords are deliberately indistinguishable.
//!
//! ## Redirects
//!
//! The `redirectTo` form field is only honored when it is a same-origin
//! relative path; anything else falls back to `/` to prevent open redirects.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
