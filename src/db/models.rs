//! Database models for the high-score table.

use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use memory_engine::Counters;
use serde::Serialize;
use tracing::instrument;

use crate::db::{DbError, schema};

/// A committed score record. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable, Getters, Serialize)]
#[diesel(table_name = schema::scores)]
pub struct Score {
    id: i32,
    player_name: String,
    moves: i32,
    time: i32,
    errors: i32,
}

impl Score {
    /// Ranking key: fewer moves first, then less time, then fewer errors.
    pub fn rank_key(&self) -> (i32, i32, i32) {
        (self.moves, self.time, self.errors)
    }
}

/// Insertable score record; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Insertable, new, Getters)]
#[diesel(table_name = schema::scores)]
pub struct NewScore {
    player_name: String,
    moves: i32,
    time: i32,
    errors: i32,
}

impl NewScore {
    /// Builds a record from a finished session's counters.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the player name is blank or a counter does not
    /// fit the table's integer columns.
    #[instrument(skip(player_name), fields(player_name = %player_name))]
    pub fn from_counters(player_name: &str, counters: Counters) -> Result<Self, DbError> {
        if player_name.trim().is_empty() {
            return Err(DbError::invalid_record("Player name cannot be blank"));
        }
        let column = |name: &str, value: u32| {
            i32::try_from(value)
                .map_err(|_| DbError::invalid_record(format!("{} value {} out of range", name, value)))
        };
        Ok(Self {
            player_name: player_name.to_string(),
            moves: column("moves", counters.moves)?,
            time: column("time", counters.elapsed_seconds)?,
            errors: column("errors", counters.errors)?,
        })
    }
}
