//! Content access decisions.
//!
//! A pure function of the file record and the (optional) authenticated
//! requester. Deny and not-found are collapsed into one response further up
//! the stack so private files cannot be probed for existence.

use uuid::Uuid;

use crate::database::models::File;
use crate::database::types::FileKind;

/// Outcome of a content access check.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ContentAccess {
    Allowed,
    /// Private record, requester absent or not the owner.
    Denied,
    /// Folders have no byte stream to serve.
    NotContentBearing,
}

/// Decide whether `requester` may read the content behind `file`.
pub fn evaluate_content_access(file: &File, requester: Option<Uuid>) -> ContentAccess {
    if file.kind == FileKind::Folder {
        return ContentAccess::NotContentBearing;
    }

    if *file.is_public {
        return ContentAccess::Allowed;
    }

    match requester {
        Some(user_id) if user_id == *file.owner_id => ContentAccess::Allowed,
        _ => ContentAccess::Denied,
    }
}
