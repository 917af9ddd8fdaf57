//! `spellquiz` - A quiz on regional English spellings
//!
//! This library provides the word bank and scoring rules, the SQLite store
//! of quiz attempts, and the HTTP server that hands out quizzes and checks
//! answers.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod quiz;
pub mod server;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use quiz::{check_answers, select_words, Country, QuizWord, WordBank};
pub use storage::{QuizStatistics, Storage};
