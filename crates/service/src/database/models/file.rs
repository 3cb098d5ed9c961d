use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::database::types::{ContentKind, DBool, DUuid, FileKind};
use crate::database::Database;

/// Page size for owner-scoped listings.
pub const PAGE_SIZE: i64 = 20;

const FILE_COLUMNS: &str =
    "id, owner_id, name, kind, is_public, parent_id, local_path, created_at";

/// A file or folder record.
///
/// Records are append-only: ids, kinds, parents, and blob paths never change
/// after creation. The only mutable field is `is_public`.
///
/// `local_path` is an internal volume path. It is never serialized to
/// clients; the HTTP layer builds its own response shape.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    pub id: DUuid,
    pub owner_id: DUuid,
    pub name: String,
    pub kind: FileKind,
    pub is_public: DBool,
    pub parent_id: Option<DUuid>,
    pub local_path: Option<String>,
    pub created_at: OffsetDateTime,
}

impl File {
    /// Create a folder record. Folders never carry a blob path.
    pub async fn create_folder(
        owner_id: Uuid,
        name: &str,
        is_public: bool,
        parent_id: Option<Uuid>,
        db: &Database,
    ) -> Result<File, sqlx::Error> {
        Self::insert(owner_id, name, FileKind::Folder, is_public, parent_id, None, db).await
    }

    /// Create a content-bearing record pointing at an already-written blob.
    ///
    /// Taking [`ContentKind`] (not [`FileKind`]) means a folder can never be
    /// created through this path, and the blob path argument is mandatory.
    pub async fn create_content(
        owner_id: Uuid,
        name: &str,
        kind: ContentKind,
        is_public: bool,
        parent_id: Option<Uuid>,
        local_path: &Path,
        db: &Database,
    ) -> Result<File, sqlx::Error> {
        let local_path = local_path.to_string_lossy();
        Self::insert(
            owner_id,
            name,
            kind.into(),
            is_public,
            parent_id,
            Some(&local_path),
            db,
        )
        .await
    }

    async fn insert(
        owner_id: Uuid,
        name: &str,
        kind: FileKind,
        is_public: bool,
        parent_id: Option<Uuid>,
        local_path: Option<&str>,
        db: &Database,
    ) -> Result<File, sqlx::Error> {
        let id = DUuid::generate();

        sqlx::query(
            r#"
            INSERT INTO files (id, owner_id, name, kind, is_public, parent_id, local_path)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(id)
        .bind(DUuid::from(owner_id))
        .bind(name)
        .bind(kind)
        .bind(DBool::from(is_public))
        .bind(parent_id.map(DUuid::from))
        .bind(local_path)
        .execute(&**db)
        .await?;

        Self::get(*id, db).await?.ok_or(sqlx::Error::RowNotFound)
    }

    /// Look up a record by id alone, regardless of owner.
    pub async fn get(id: Uuid, db: &Database) -> Result<Option<File>, sqlx::Error> {
        sqlx::query_as::<_, File>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE id = ?1"
        ))
        .bind(DUuid::from(id))
        .fetch_optional(&**db)
        .await
    }

    /// Look up a record scoped to its owner.
    ///
    /// A wrong id, a wrong owner, and a nonexistent record are all the same
    /// no-match; callers cannot tell them apart.
    pub async fn get_for_user(
        id: Uuid,
        owner_id: Uuid,
        db: &Database,
    ) -> Result<Option<File>, sqlx::Error> {
        sqlx::query_as::<_, File>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE id = ?1 AND owner_id = ?2"
        ))
        .bind(DUuid::from(id))
        .bind(DUuid::from(owner_id))
        .fetch_optional(&**db)
        .await
    }

    /// Page through an owner's records under one parent (None = root).
    pub async fn list_for_user(
        owner_id: Uuid,
        parent_id: Option<Uuid>,
        page: i64,
        db: &Database,
    ) -> Result<Vec<File>, sqlx::Error> {
        let offset = page.max(0) * PAGE_SIZE;
        sqlx::query_as::<_, File>(&format!(
            r#"
            SELECT {FILE_COLUMNS} FROM files
            WHERE owner_id = ?1 AND parent_id IS ?2
            ORDER BY created_at ASC, id ASC
            LIMIT ?3 OFFSET ?4
            "#
        ))
        .bind(DUuid::from(owner_id))
        .bind(parent_id.map(DUuid::from))
        .bind(PAGE_SIZE)
        .bind(offset)
        .fetch_all(&**db)
        .await
    }

    /// Toggle visibility, scoped to the owner. Returns the updated record,
    /// or None when the (id, owner) pair matches nothing.
    pub async fn set_public(
        id: Uuid,
        owner_id: Uuid,
        is_public: bool,
        db: &Database,
    ) -> Result<Option<File>, sqlx::Error> {
        let result = sqlx::query("UPDATE files SET is_public = ?1 WHERE id = ?2 AND owner_id = ?3")
            .bind(DBool::from(is_public))
            .bind(DUuid::from(id))
            .bind(DUuid::from(owner_id))
            .execute(&**db)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::get(id, db).await
    }

    pub async fn count(db: &Database) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM files")
            .fetch_one(&**db)
            .await
    }

    /// The volume path of this record's primary blob, if it has one.
    pub fn blob_path(&self) -> Option<PathBuf> {
        self.local_path.as_deref().map(PathBuf::from)
    }
}
