//! Database bootstrap: connection pools, schema migrations and the optional
//! demo account.

use crate::{auth::resolver::IdentityResolver, error::AppError, repository::UserRepository};
use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Opens a pool against `database_url`, creating the database file if needed.
pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Opens a migrated, private in-memory database.
///
/// An in-memory SQLite database lives and dies with its connection, so the
/// pool holds exactly one connection and never recycles it.
pub async fn connect_in_memory() -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}

/// Applies the embedded migrations under `migrations/`.
pub async fn migrate(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Creates the demo account unless a user with that name already exists.
///
/// Returns whether an account was created.
pub async fn seed_demo_user(
    users: &UserRepository,
    identity: &IdentityResolver,
    username: &str,
    password: &str,
) -> Result<bool, AppError> {
    if users.find_by_username(username).await?.is_some() {
        return Ok(false);
    }
    identity.register(username, password).await?;
    info!("Created demo user '{}'", username);
    Ok(true)
}
