//! Username/password authentication.
//!
//! The flow mirrors a classic form login: `GET /login` renders page data
//! (including any error stashed by a previous failed attempt), `POST /login`
//! dispatches on the submitted `intent` to either verify credentials or
//! create an account, and `POST /logout` drops the session cookie. Sessions
//! are a signed cookie; nothing is stored server-side.

pub(crate) mod authenticator;
pub(crate) mod error;
pub mod login;
pub(crate) mod password;
pub(crate) mod session;
pub(crate) mod state;
pub(crate) mod storage;
pub(crate) mod types;
pub(crate) mod utils;

pub use authenticator::Authenticator;
pub use state::{AuthConfig, AuthState};
