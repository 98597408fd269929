//! Database access for user records.
//!
//! One table: `users (id, username, password_hash, created_at)` with a unique
//! index on `username`. Signup inserts and catches the unique violation
//! instead of checking first, so concurrent signups with the same name cannot
//! both succeed.

use anyhow::{Context, Result};
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::utils::is_unique_violation;

/// Minimal fields needed to verify a login.
pub(super) struct UserRecord {
    pub(super) id: Uuid,
    pub(super) password_hash: String,
}

/// Outcome when attempting to create a new user.
#[derive(Debug)]
pub(super) enum SignupOutcome {
    Created(Uuid),
    Conflict,
}

/// Look up a user by username. Case-sensitive, as stored.
pub(super) async fn lookup_user(pool: &PgPool, username: &str) -> Result<Option<UserRecord>> {
    let query = "SELECT id, password_hash FROM users WHERE username = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(username)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user")?;

    Ok(row.map(|row| UserRecord {
        id: row.get("id"),
        password_hash: row.get("password_hash"),
    }))
}

/// Insert a new user, mapping the unique-index violation to `Conflict`.
pub(super) async fn insert_user(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
) -> Result<SignupOutcome> {
    let query = r"
        INSERT INTO users (username, password_hash)
        VALUES ($1, $2)
        RETURNING id
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(username)
        .bind(password_hash)
        .fetch_one(pool)
        .instrument(span)
        .await;

    match row {
        Ok(row) => Ok(SignupOutcome::Created(row.get("id"))),
        Err(err) => conflict_from(err),
    }
}

/// Map the unique-index violation to `Conflict`; anything else propagates.
fn conflict_from(err: sqlx::Error) -> Result<SignupOutcome> {
    if is_unique_violation(&err) {
        Ok(SignupOutcome::Conflict)
    } else {
        Err(err).context("failed to insert user")
    }
}
