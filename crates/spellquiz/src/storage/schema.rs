//! `SQLite` schema definitions for spellquiz.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the quiz attempts table.
pub const CREATE_ATTEMPTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS quiz_attempts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ip_address TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    final_score INTEGER NOT NULL,
    correct_count INTEGER NOT NULL,
    total_count INTEGER NOT NULL
)
";

/// SQL statement to create the per-answer table.
///
/// `correct_answer` is NULL for answers that could not be scored.
pub const CREATE_ANSWERS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS quiz_answers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    attempt_id INTEGER NOT NULL,
    word_index INTEGER NOT NULL,
    is_level1 INTEGER NOT NULL,
    country TEXT,
    user_answer TEXT NOT NULL,
    correct_answer TEXT,
    is_correct INTEGER NOT NULL,
    FOREIGN KEY (attempt_id) REFERENCES quiz_attempts(id)
)
";

/// SQL statement to create an index on attempt timestamp.
pub const CREATE_TIMESTAMP_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_attempts_timestamp ON quiz_attempts(timestamp DESC)
";

/// SQL statement to create an index for looking up answers by attempt.
pub const CREATE_ATTEMPT_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_answers_attempt ON quiz_answers(attempt_id)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_ATTEMPTS_TABLE,
    CREATE_ANSWERS_TABLE,
    CREATE_TIMESTAMP_INDEX,
    CREATE_ATTEMPT_INDEX,
    CREATE_METADATA_TABLE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_attempts_table_columns() {
        assert!(CREATE_ATTEMPTS_TABLE.contains("ip_address TEXT NOT NULL"));
        assert!(CREATE_ATTEMPTS_TABLE.contains("final_score INTEGER NOT NULL"));
        assert!(CREATE_ATTEMPTS_TABLE.contains("total_count INTEGER NOT NULL"));
    }

    #[test]
    fn test_answers_table_references_attempts() {
        assert!(CREATE_ANSWERS_TABLE.contains("REFERENCES quiz_attempts(id)"));
        assert!(CREATE_ANSWERS_TABLE.contains("correct_answer TEXT,"));
    }
}
