mod dbool;
mod duuid;
mod file_kind;

pub use dbool::DBool;
pub use duuid::DUuid;
pub use file_kind::{ContentKind, FileKind};
