use serde::{Deserialize, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef};
use sqlx::{Decode, Encode, Sqlite, Type};

/// Kind of a file record, stored as TEXT in sqlite.
///
/// `Folder` records are purely organizational and never carry a blob path;
/// the content-bearing kinds are split out into [`ContentKind`] so the
/// upload path cannot construct a folder with content or vice versa.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Folder,
    File,
    Image,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Folder => "folder",
            FileKind::File => "file",
            FileKind::Image => "image",
        }
    }

    /// Parse a client-supplied type string. Returns None for unknown kinds.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "folder" => Some(FileKind::Folder),
            "file" => Some(FileKind::File),
            "image" => Some(FileKind::Image),
            _ => None,
        }
    }

    /// The content-bearing refinement of this kind, if any.
    pub fn content_kind(&self) -> Option<ContentKind> {
        match self {
            FileKind::Folder => None,
            FileKind::File => Some(ContentKind::File),
            FileKind::Image => Some(ContentKind::Image),
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The subset of kinds that carry a stored blob.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ContentKind {
    File,
    Image,
}

impl From<ContentKind> for FileKind {
    fn from(kind: ContentKind) -> Self {
        match kind {
            ContentKind::File => FileKind::File,
            ContentKind::Image => FileKind::Image,
        }
    }
}

impl Decode<'_, Sqlite> for FileKind {
    fn decode(value: SqliteValueRef<'_>) -> Result<Self, BoxDynError> {
        let raw = <String as Decode<Sqlite>>::decode(value)?;
        FileKind::parse(&raw).ok_or_else(|| format!("unknown file kind: {raw}").into())
    }
}

impl Encode<'_, Sqlite> for FileKind {
    fn encode_by_ref(
        &self,
        args: &mut Vec<SqliteArgumentValue<'_>>,
    ) -> Result<IsNull, BoxDynError> {
        args.push(SqliteArgumentValue::Text(self.as_str().into()));
        Ok(IsNull::No)
    }
}

impl Type<Sqlite> for FileKind {
    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <String as Type<Sqlite>>::compatible(ty)
    }

    fn type_info() -> SqliteTypeInfo {
        <String as Type<Sqlite>>::type_info()
    }
}
