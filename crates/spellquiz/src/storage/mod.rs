//! Storage layer for spellquiz.
//!
//! This module provides `SQLite`-based persistent storage for quiz attempts
//! and their individual answers, plus the aggregate statistics shown after
//! each attempt.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::quiz::{AnswerResult, Score};

/// Storage engine for quiz attempts.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

/// A finished attempt, ready to be recorded.
#[derive(Debug, Clone, Copy)]
pub struct NewAttempt<'a> {
    /// Address of the client that submitted the attempt.
    pub ip_address: &'a str,
    /// When the attempt was checked.
    pub timestamp: DateTime<Utc>,
    /// The attempt's score.
    pub score: Score,
    /// Per-answer results.
    pub answers: &'a [AnswerResult],
}

/// A stored attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    /// Row id.
    pub id: i64,
    /// Client address.
    pub ip_address: String,
    /// When the attempt was checked.
    pub timestamp: DateTime<Utc>,
    /// The attempt's score.
    pub score: Score,
}

/// A stored answer belonging to an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    /// Row id.
    pub id: i64,
    /// Owning attempt.
    pub attempt_id: i64,
    /// Position of the word in the quiz.
    pub word_index: usize,
    /// Whether this was a level-1 answer.
    pub is_level1: bool,
    /// Country code the answer was scored against.
    pub country: Option<String>,
    /// Trimmed answer as typed.
    pub user_answer: String,
    /// Expected spelling; `None` for unscored answers.
    pub correct_answer: Option<String>,
    /// Whether the answer matched.
    pub is_correct: bool,
}

/// Aggregate statistics over all recorded attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuizStatistics {
    /// Number of recorded attempts.
    pub total_attempts: i64,
    /// Mean final score, rounded half-to-even; 0 with no attempts.
    pub average_score: i64,
    /// Number of attempts that scored 100.
    pub perfect_scores: i64,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;",
        )?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record an attempt and all of its answers atomically.
    ///
    /// Returns the id assigned to the attempt.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails; nothing is
    /// written in that case.
    pub fn record_attempt(&mut self, attempt: &NewAttempt<'_>) -> Result<i64> {
        let tx = self.conn.transaction()?;

        tx.execute(
            r"
            INSERT INTO quiz_attempts (ip_address, timestamp, final_score, correct_count, total_count)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
            params![
                attempt.ip_address,
                attempt.timestamp.to_rfc3339(),
                attempt.score.percentage,
                attempt.score.correct,
                attempt.score.total,
            ],
        )?;
        let attempt_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                r"
                INSERT INTO quiz_answers
                    (attempt_id, word_index, is_level1, country, user_answer, correct_answer, is_correct)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ",
            )?;
            for answer in attempt.answers {
                let word_index = i64::try_from(answer.word_index).map_err(|_| {
                    Error::internal(format!("word index {} out of range", answer.word_index))
                })?;
                stmt.execute(params![
                    attempt_id,
                    word_index,
                    answer.is_level1,
                    answer.country.map(|c| c.code()),
                    answer.user_answer,
                    answer.correct_answer,
                    answer.correct,
                ])?;
            }
        }

        tx.commit()?;
        debug!(
            "Recorded attempt {} with {} answers",
            attempt_id,
            attempt.answers.len()
        );
        Ok(attempt_id)
    }

    /// Compute aggregate statistics over all attempts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn statistics(&self) -> Result<QuizStatistics> {
        let (total_attempts, average, perfect_scores): (i64, Option<f64>, i64) =
            self.conn.query_row(
                r"
                SELECT COUNT(*),
                       AVG(final_score),
                       COALESCE(SUM(CASE WHEN final_score = 100 THEN 1 ELSE 0 END), 0)
                FROM quiz_attempts
                ",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?;

        #[allow(clippy::cast_possible_truncation)]
        let average_score = average.map_or(0, |avg| avg.round_ties_even() as i64);

        Ok(QuizStatistics {
            total_attempts,
            average_score,
            perfect_scores,
        })
    }

    /// Count recorded attempts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM quiz_attempts", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get the most recent attempts, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn recent_attempts(&self, limit: usize) -> Result<Vec<AttemptRecord>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, ip_address, timestamp, final_score, correct_count, total_count
            FROM quiz_attempts ORDER BY timestamp DESC, id DESC LIMIT ?1
            ",
        )?;

        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let attempts = stmt
            .query_map([limit_i64], Self::row_to_attempt)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(attempts)
    }

    /// Get the answers recorded for an attempt, in submission order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn answers_for(&self, attempt_id: i64) -> Result<Vec<AnswerRecord>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, attempt_id, word_index, is_level1, country, user_answer, correct_answer, is_correct
            FROM quiz_answers WHERE attempt_id = ?1 ORDER BY id ASC
            ",
        )?;

        let answers = stmt
            .query_map([attempt_id], |row| {
                let word_index: i64 = row.get(2)?;
                Ok(AnswerRecord {
                    id: row.get(0)?,
                    attempt_id: row.get(1)?,
                    word_index: usize::try_from(word_index).map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(2, Type::Integer, Box::new(e))
                    })?,
                    is_level1: row.get(3)?,
                    country: row.get(4)?,
                    user_answer: row.get(5)?,
                    correct_answer: row.get(6)?,
                    is_correct: row.get(7)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(answers)
    }

    fn row_to_attempt(row: &rusqlite::Row) -> rusqlite::Result<AttemptRecord> {
        let id: i64 = row.get(0)?;
        let timestamp_str: String = row.get(2)?;

        let timestamp = DateTime::parse_from_rfc3339(&timestamp_str).map_or_else(
            |_| {
                warn!("Attempt {} has unparseable timestamp {}", id, timestamp_str);
                DateTime::<Utc>::default()
            },
            |dt| dt.with_timezone(&Utc),
        );

        Ok(AttemptRecord {
            id,
            ip_address: row.get(1)?,
            timestamp,
            score: Score {
                percentage: row.get(3)?,
                correct: row.get(4)?,
                total: row.get(5)?,
            },
        })
    }
}
