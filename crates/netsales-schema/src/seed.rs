//! Default-row seeding.
//!
//! Runs after reconciliation, never as part of it: the reconciler mutates
//! structure only. Each seed row is guarded by an existence check, so the
//! whole pass is re-runnable. Currently seeds the default administrative
//! account (Argon2id-hashed password) and the dashboard welcome item.

use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use password_hash::rand_core::OsRng;
use sqlx::sqlite::SqlitePool;
use tracing::info;

use crate::error::{Result, SchemaError};

/// Username of the seeded administrator account.
pub const ADMIN_USERNAME: &str = "admin";

/// Initial password of the seeded administrator account. Operators are
/// expected to rotate it on first login.
pub const ADMIN_INITIAL_PASSWORD: &str = "ChangeMe123";

const WELCOME_TITLE: &str = "Welcome to netsales";

/// Hashes a password using Argon2id, returning a PHC string that includes
/// the salt.
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| SchemaError::Seed(format!("password hashing failed: {err}")))?;

    Ok(password_hash.to_string())
}

/// Inserts the default rows that are missing, returning the identities of
/// the rows seeded this run.
pub async fn seed_defaults(pool: &SqlitePool) -> Result<Vec<String>> {
    let mut seeded = Vec::new();

    let admin: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE username = ?")
        .bind(ADMIN_USERNAME)
        .fetch_optional(pool)
        .await?;
    if admin.is_none() {
        let password_hash = hash_password(ADMIN_INITIAL_PASSWORD)?;
        sqlx::query(
            "INSERT INTO users (username, password_hash, full_name, role) \
             VALUES (?, ?, 'Administrator', 'admin')",
        )
        .bind(ADMIN_USERNAME)
        .bind(&password_hash)
        .execute(pool)
        .await?;
        info!(username = ADMIN_USERNAME, "Seeded administrator account");
        seeded.push(format!("users.{ADMIN_USERNAME}"));
    }

    let welcome: Option<(i64,)> = sqlx::query_as("SELECT id FROM hot_news WHERE title = ?")
        .bind(WELCOME_TITLE)
        .fetch_optional(pool)
        .await?;
    if welcome.is_none() {
        sqlx::query(
            "INSERT INTO hot_news (title, body, published) \
             VALUES (?, 'The netsales dashboard is ready to use.', 1)",
        )
        .bind(WELCOME_TITLE)
        .execute(pool)
        .await?;
        info!("Seeded dashboard welcome item");
        seeded.push("hot_news.welcome".to_string());
    }

    Ok(seeded)
}
