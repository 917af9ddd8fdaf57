//! Error types for spellquiz.
//!
//! This module defines all error types used throughout the spellquiz crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for spellquiz operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration or a word bank file.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Quiz Errors ===
    /// The word bank is structurally unusable.
    #[error("invalid word bank: {message}")]
    InvalidWordBank {
        /// Description of the problem.
        message: String,
    },

    /// A submitted answer refers to a word that is not part of the quiz.
    #[error("answer refers to word {word_index} but the quiz has {quiz_len} words")]
    WordIndexOutOfRange {
        /// Index sent by the client.
        word_index: usize,
        /// Number of words in the submitted quiz.
        quiz_len: usize,
    },

    /// A request body could not be read as a quiz submission.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// What was wrong with the body.
        message: String,
    },

    // === Server Errors ===
    /// Failed to bind the listening socket.
    #[error("failed to bind to {address}: {source}")]
    Bind {
        /// The address we tried to bind.
        address: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === I/O Errors ===
    /// File system or socket operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for spellquiz operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a new word bank error.
    #[must_use]
    pub fn invalid_word_bank(message: impl Into<String>) -> Self {
        Self::InvalidWordBank {
            message: message.into(),
        }
    }

    /// Create a new invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Check if this error was caused by bad client input rather than
    /// a failure on our side.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::WordIndexOutOfRange { .. } | Self::InvalidRequest { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_invalid_word_bank_display() {
        let err = Error::invalid_word_bank("group 'Group 1' has no words");
        assert_eq!(
            err.to_string(),
            "invalid word bank: group 'Group 1' has no words"
        );
    }

    #[test]
    fn test_word_index_out_of_range() {
        let err = Error::WordIndexOutOfRange {
            word_index: 9,
            quiz_len: 8,
        };
        assert!(err.is_client_error());
        let msg = err.to_string();
        assert!(msg.contains('9'));
        assert!(msg.contains('8'));
    }

    #[test]
    fn test_invalid_request_is_client_error() {
        let err = Error::invalid_request("missing field `wordIndex`");
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "invalid request: missing field `wordIndex`");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_bind_error_display() {
        let err = Error::Bind {
            address: "0.0.0.0:5000".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use"),
        };
        let msg = err.to_string();
        assert!(msg.contains("0.0.0.0:5000"));
        assert!(msg.contains("address in use"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "port must be non-zero".to_string(),
        };
        assert!(err.to_string().contains("port must be non-zero"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
