//! Typed failures for the login and signup flow.
//!
//! Every variant is recovered at the request boundary: login failures become a
//! redirect with a session-carried message, signup and intent failures become
//! a structured 400 response. Only `Internal` surfaces as a 500.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed form fields (empty username or password).
    #[error("{0}")]
    InvalidInput(&'static str),
    /// Unknown username or wrong password. The message is deliberately
    /// generic so account existence cannot be probed.
    #[error("Invalid Username or Password")]
    InvalidCredentials,
    /// Signup with a username that is already taken.
    #[error("A user already exists with this username")]
    DuplicateUser,
    /// Unrecognized `intent` form value.
    #[error("Invalid intent")]
    InvalidIntent,
    /// Unexpected persistence or hashing failure.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
