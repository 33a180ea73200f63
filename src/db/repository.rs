//! SQLite-backed score repository.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{DbError, DbErrorKind, NewScore, Score, ScoreStore, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Database repository for score records.
///
/// Each operation opens its own connection, so a repository can be cloned
/// and shared across threads freely.
#[derive(Debug, Clone)]
pub struct ScoreRepository {
    db_path: String,
}

impl ScoreRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// The file is created on first connection. Call
    /// [`ScoreRepository::run_migrations`] before use.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::connection("Database path cannot be empty"));
        }
        info!(path = %db_path, "Creating ScoreRepository");
        Ok(Self { db_path })
    }

    /// Creates a repository and brings its schema up to date.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        let repository = Self::new(db_path)?;
        repository.run_migrations()?;
        Ok(repository)
    }

    /// Path of the backing database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::connection(format!("Failed to connect to '{}': {}", self.db_path, e)))?;
        conn.batch_execute(&format!("PRAGMA busy_timeout = {};", BUSY_TIMEOUT_MS))?;
        Ok(conn)
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(DbErrorKind::Migration, format!("Migration failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Records a finished game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, score), fields(player_name = %score.player_name(), moves = score.moves()))]
    pub fn record_score(&self, score: NewScore) -> Result<Score, DbError> {
        debug!("Recording score");
        let mut conn = self.connection()?;

        let stored = diesel::insert_into(schema::scores::table)
            .values(&score)
            .returning(Score::as_returning())
            .get_result(&mut conn)?;

        info!(
            score_id = stored.id(),
            player_name = %stored.player_name(),
            moves = stored.moves(),
            time = stored.time(),
            errors = stored.errors(),
            "Score recorded"
        );
        Ok(stored)
    }

    /// Gets the best scores, ordered by moves, time and errors ascending.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_top_scores(&self, limit: usize) -> Result<Vec<Score>, DbError> {
        debug!(limit, "Loading top scores");
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut conn = self.connection()?;

        let scores = schema::scores::table
            .order((
                schema::scores::moves.asc(),
                schema::scores::time.asc(),
                schema::scores::errors.asc(),
                schema::scores::id.asc(),
            ))
            .limit(limit)
            .select(Score::as_select())
            .load(&mut conn)?;

        info!(count = scores.len(), "Top scores loaded");
        Ok(scores)
    }

    /// Counts all stored records.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn count_scores(&self) -> Result<i64, DbError> {
        let mut conn = self.connection()?;
        let count: i64 = schema::scores::table.count().get_result(&mut conn)?;
        debug!(count, "Scores counted");
        Ok(count)
    }
}

impl ScoreStore for ScoreRepository {
    fn insert(&self, score: NewScore) -> Result<Score, DbError> {
        self.record_score(score)
    }

    fn top_scores(&self, limit: usize) -> Result<Vec<Score>, DbError> {
        self.get_top_scores(limit)
    }
}
