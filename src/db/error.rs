//! Score store error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// What went wrong in the score store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DbErrorKind {
    /// The database file could not be opened.
    #[display("connection")]
    Connection,
    /// The schema could not be brought up to date.
    #[display("migration")]
    Migration,
    /// A statement failed while reading or writing records.
    #[display("query")]
    Query,
    /// The record was refused before reaching storage.
    #[display("invalid record")]
    InvalidRecord,
}

impl DbErrorKind {
    /// Returns true for failures of the storage itself, as opposed to a
    /// record the store refused.
    pub fn is_storage_failure(self) -> bool {
        !matches!(self, Self::InvalidRecord)
    }
}

/// Score store error with the location where it was raised.
#[derive(Debug, Clone, Display, Error)]
#[display("Score store {} error: {} at {}:{}", kind, message, file, line)]
pub struct DbError {
    /// Failure category.
    pub kind: DbErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DbError {
    /// Creates an error of the given kind at the caller's location.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: DbErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// A record that fails validation.
    #[track_caller]
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::new(DbErrorKind::InvalidRecord, message)
    }

    /// A database that cannot be opened.
    #[track_caller]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(DbErrorKind::Connection, message)
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(DbErrorKind::Query, err.to_string())
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::connection(err.to_string())
    }
}
