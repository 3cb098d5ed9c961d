pub mod models;
mod sqlite;
pub mod types;

use std::ops::Deref;

use sqlx::SqlitePool;

/// Handle to the metadata store.
///
/// Insert acknowledgments are durable: every create re-reads the row it
/// wrote before returning, so a record returned to a caller is always
/// visible to subsequent lookups.
#[derive(Clone, Debug)]
pub struct Database(SqlitePool);

impl Database {
    pub async fn connect(database_url: &url::Url) -> Result<Self, DatabaseSetupError> {
        if database_url.scheme() == "sqlite" {
            let pool = sqlite::connect_sqlite(database_url).await?;
            sqlite::migrate_sqlite(&pool).await?;
            return Ok(Database(pool));
        }

        Err(DatabaseSetupError::UnknownDbType(
            database_url.scheme().to_string(),
        ))
    }

    /// Cheap liveness probe used by the status endpoint.
    pub async fn is_alive(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.0).await.is_ok()
    }
}

impl Deref for Database {
    type Target = SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseSetupError {
    #[error("error occurred while attempting database migration: {0}")]
    MigrationFailed(#[from] sqlx::migrate::MigrateError),

    #[error("unable to perform initial connection and check of the database: {0}")]
    Unavailable(#[from] sqlx::Error),

    #[error("requested database type was not recognized: {0}")]
    UnknownDbType(String),
}
