//! Database persistence layer for the high-score table.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only
mod store;

pub use error::{DbError, DbErrorKind};
pub use models::{NewScore, Score};
pub use repository::ScoreRepository;
pub use store::{ScoreStore, TOP_SCORES_LIMIT};
