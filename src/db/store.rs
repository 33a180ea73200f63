//! Score store contract.

use crate::db::{DbError, NewScore, Score};

/// Number of records shown on the best-scores table.
pub const TOP_SCORES_LIMIT: usize = 10;

/// Durable append-only store of score records.
///
/// Records are never updated or deleted. Implementations must accept
/// concurrent inserts and queries; a reader sees a record either fully
/// committed or not at all.
pub trait ScoreStore: std::fmt::Debug + Send + Sync {
    /// Appends a record and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] on storage I/O failure. Not retried.
    fn insert(&self, score: NewScore) -> Result<Score, DbError>;

    /// Returns up to `limit` records ordered by moves, then time, then
    /// errors, all ascending. An empty store yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] on storage I/O failure.
    fn top_scores(&self, limit: usize) -> Result<Vec<Score>, DbError>;
}
