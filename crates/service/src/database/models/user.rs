use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::database::types::DUuid;
use crate::database::Database;

/// Registered identity. Owns zero or more file records.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: DUuid,
    pub email: String,
    pub password_digest: String,
    pub created_at: OffsetDateTime,
}

impl User {
    /// Register a new identity with an already-hashed password.
    pub async fn create(
        email: &str,
        password_digest: &str,
        db: &Database,
    ) -> Result<User, sqlx::Error> {
        let id = DUuid::generate();

        sqlx::query("INSERT INTO users (id, email, password_digest) VALUES (?1, ?2, ?3)")
            .bind(id)
            .bind(email)
            .bind(password_digest)
            .execute(&**db)
            .await?;

        Self::get(*id, db).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn get(id: Uuid, db: &Database) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_digest, created_at FROM users WHERE id = ?1",
        )
        .bind(DUuid::from(id))
        .fetch_optional(&**db)
        .await
    }

    pub async fn by_email(email: &str, db: &Database) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_digest, created_at FROM users WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(&**db)
        .await
    }

    pub async fn count(db: &Database) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&**db)
            .await
    }
}
