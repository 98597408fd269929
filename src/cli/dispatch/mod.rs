//! Command-line argument dispatch and server initialization.
//!
//! This module parses validated CLI arguments and maps them to the appropriate
//! action, such as starting the login service with its full configuration.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::session::{ARG_BASE_URL, ARG_SESSION_SECRET};
use anyhow::{Context, Result, anyhow};
use secrecy::SecretString;
use url::Url;

/// Session cookies are HMAC-SHA256 signed; shorter secrets weaken the tag.
const MIN_SESSION_SECRET_LEN: usize = 32;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let session_secret = matches
        .get_one::<String>(ARG_SESSION_SECRET)
        .cloned()
        .context("missing required argument: --session-secret")?;

    if session_secret.len() < MIN_SESSION_SECRET_LEN {
        return Err(anyhow!(
            "--session-secret must be at least {MIN_SESSION_SECRET_LEN} characters"
        ));
    }

    let base_url = matches
        .get_one::<String>(ARG_BASE_URL)
        .cloned()
        .unwrap_or_else(|| "http://localhost:8080".to_string());

    let parsed = Url::parse(&base_url).with_context(|| format!("Invalid base URL: {base_url}"))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(anyhow!("Base URL must use http or https: {base_url}"));
    }

    Ok(Action::Server(Args {
        port,
        dsn,
        session_secret: SecretString::from(session_secret),
        base_url,
    }))
}
