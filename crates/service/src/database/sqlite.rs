use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use super::DatabaseSetupError;

pub(crate) async fn connect_sqlite(url: &url::Url) -> Result<SqlitePool, DatabaseSetupError> {
    let options = SqliteConnectOptions::from_str(url.as_str())
        .map_err(DatabaseSetupError::Unavailable)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    // In-memory databases are per-connection; pin the pool to one connection
    // so every query sees the same database.
    let max_connections = if url.path() == ":memory:" { 1 } else { 8 };

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .map_err(DatabaseSetupError::Unavailable)
}

pub(crate) async fn migrate_sqlite(pool: &SqlitePool) -> Result<(), DatabaseSetupError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(DatabaseSetupError::MigrationFailed)
}
