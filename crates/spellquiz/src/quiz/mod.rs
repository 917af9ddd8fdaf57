//! Quiz domain types.
//!
//! A quiz is drawn from a [`WordBank`]: one word per [`WordGroup`], each
//! word carrying its spelling in every supported [`Country`]. Answers are
//! scored by [`check_answers`].

mod bank;
mod scoring;
mod select;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use bank::{LevelDescription, WordBank, WordEntry, WordGroup};
pub use scoring::{check_answers, AnswerResult, CheckedQuiz, Score, SubmittedAnswer};
pub use select::select_words;

/// A country whose spelling conventions the quiz covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Country {
    /// United States.
    Us,
    /// Canada.
    Ca,
    /// United Kingdom.
    Gb,
    /// Australia.
    Au,
    /// New Zealand.
    Nz,
}

impl Country {
    /// Every country, US first.
    pub const ALL: [Self; 5] = [Self::Us, Self::Ca, Self::Gb, Self::Au, Self::Nz];

    /// The wire name of this country.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Us => "us",
            Self::Ca => "ca",
            Self::Gb => "gb",
            Self::Au => "au",
            Self::Nz => "nz",
        }
    }
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Country {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "us" => Ok(Self::Us),
            "ca" => Ok(Self::Ca),
            "gb" => Ok(Self::Gb),
            "au" => Ok(Self::Au),
            "nz" => Ok(Self::Nz),
            other => Err(format!("unknown country: {other}")),
        }
    }
}

/// The spelling of one word in every country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spellings {
    /// US spelling.
    pub us: String,
    /// Canadian spelling.
    pub ca: String,
    /// British spelling.
    pub gb: String,
    /// Australian spelling.
    pub au: String,
    /// New Zealand spelling.
    pub nz: String,
}

impl Spellings {
    /// Build spellings from the US form and the four others in
    /// `ca, gb, au, nz` order.
    #[must_use]
    pub fn new(us: &str, [ca, gb, au, nz]: [&str; 4]) -> Self {
        Self {
            us: us.to_string(),
            ca: ca.to_string(),
            gb: gb.to_string(),
            au: au.to_string(),
            nz: nz.to_string(),
        }
    }

    /// Spellings where every non-US country agrees.
    #[must_use]
    pub fn uniform(us: &str, rest: &str) -> Self {
        Self::new(us, [rest; 4])
    }

    /// The spelling used in `country`.
    #[must_use]
    pub fn get(&self, country: Country) -> &str {
        match country {
            Country::Us => &self.us,
            Country::Ca => &self.ca,
            Country::Gb => &self.gb,
            Country::Au => &self.au,
            Country::Nz => &self.nz,
        }
    }
}

/// A word as handed to (and echoed back by) the quiz client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizWord {
    /// Spelling per country.
    #[serde(flatten)]
    pub spellings: Spellings,
    /// Usage note; empty when the word needs none.
    #[serde(default)]
    pub note: String,
    /// Difficulty level of the group this word was drawn from.
    pub level: u8,
}
