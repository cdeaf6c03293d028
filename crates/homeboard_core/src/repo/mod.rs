//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for one entity family.
//! - Isolate SQLite query and transaction details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce entity `validate()` before persistence.
//! - Every mutating operation runs inside one IMMEDIATE transaction; a
//!   failure before commit leaves no partial writes behind.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::content::{ContentId, ContentValidationError};
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod card_repo;
pub mod carousel_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error taxonomy shared by the card and carousel families.
#[derive(Debug)]
pub enum RepoError {
    /// Entity failed write-path validation; no storage was touched.
    Validation(ContentValidationError),
    /// Non-positive id rejected before any storage access.
    InvalidId(ContentId),
    /// Target row does not exist (update paths only; reads return `None`).
    NotFound(ContentId),
    /// The write lost a race against another connection; safe to retry.
    Conflict,
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
    /// Storage engine failure; any in-flight transaction was rolled back.
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidId(id) => write!(f, "invalid content id: {id}"),
            Self::NotFound(id) => write!(f, "content item not found: {id}"),
            Self::Conflict => write!(f, "write conflicted with a concurrent transaction"),
            Self::InvalidData(message) => write!(f, "invalid persisted content data: {message}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ContentValidationError> for RepoError {
    fn from(value: ContentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        // SQLITE_BUSY/SQLITE_LOCKED mean another connection held the write
        // lock past the busy timeout; surface that as a retryable conflict.
        match value.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => Self::Conflict,
            _ => Self::Db(DbError::Sqlite(value)),
        }
    }
}

/// Rejects non-positive ids before any storage access.
pub(crate) fn ensure_valid_id(id: ContentId) -> RepoResult<ContentId> {
    if id <= 0 {
        return Err(RepoError::InvalidId(id));
    }
    Ok(id)
}
