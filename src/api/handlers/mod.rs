//! API handlers for ensaluti.
//!
//! `auth` carries the login/signup/logout flow and the session machinery;
//! `health` reports service and database status.

pub mod auth;
pub mod health;
