use std::str::FromStr;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use tracing::info;

use crate::error::AuthError;

/// Open the SQLite pool and apply pending migrations.
///
/// Every pooled connection runs with write-ahead logging and
/// `synchronous=NORMAL`: readers never block on the writer and commits skip
/// the full fsync, at the cost of possibly losing the last committed
/// transaction on an abrupt crash. Row writes stay atomic either way.
pub async fn connect(database_url: &str) -> Result<SqlitePool, AuthError> {
    let opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(opts)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!(url = %database_url, "sqlite pool ready");

    Ok(pool)
}

/// In-memory database for tests. A single persistent connection keeps the
/// database alive for the pool's lifetime.
pub async fn connect_in_memory() -> Result<SqlitePool, AuthError> {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")?;

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect_with(opts)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}
