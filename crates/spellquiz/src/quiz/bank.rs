//! The word bank quizzes are drawn from.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use figment::{
    providers::{Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Spellings;
use crate::error::{Error, Result};

/// A single word and its regional spellings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    /// Spelling per country.
    #[serde(flatten)]
    pub spellings: Spellings,
    /// Disambiguating note, e.g. "computer program".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl WordEntry {
    fn plain(spellings: Spellings) -> Self {
        Self {
            spellings,
            note: None,
        }
    }

    fn noted(spellings: Spellings, note: &str) -> Self {
        Self {
            spellings,
            note: Some(note.to_string()),
        }
    }
}

/// A group of interchangeable words; a quiz asks about one of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordGroup {
    /// Display name.
    pub name: String,
    /// Difficulty level.
    pub level: u8,
    /// Candidate words. Must not be empty.
    pub words: Vec<WordEntry>,
}

/// Human-readable description of a difficulty level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDescription {
    /// The level number.
    pub level: u8,
    /// What words at this level have in common.
    pub description: String,
}

/// The full set of word groups and level descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordBank {
    /// Level descriptions.
    pub levels: Vec<LevelDescription>,
    /// Word groups, in quiz order.
    pub groups: Vec<WordGroup>,
}

impl WordBank {
    /// The word bank shipped with spellquiz.
    #[must_use]
    pub fn builtin() -> Self {
        let group = |n: usize, level: u8, words: Vec<WordEntry>| WordGroup {
            name: format!("Group {n}"),
            level,
            words,
        };

        Self {
            levels: vec![
                LevelDescription {
                    level: 1,
                    description: "Words spelled the same in every country other than the US"
                        .to_string(),
                },
                LevelDescription {
                    level: 2,
                    description: "Words spelled differently in non-US countries".to_string(),
                },
                LevelDescription {
                    level: 3,
                    description: "Words spelled differently depending on context".to_string(),
                },
            ],
            groups: vec![
                group(
                    1,
                    1,
                    vec![
                        WordEntry::plain(Spellings::uniform("canceled", "cancelled")),
                        WordEntry::plain(Spellings::uniform("traveled", "travelled")),
                    ],
                ),
                group(
                    2,
                    1,
                    vec![WordEntry::plain(Spellings::uniform("defense", "defence"))],
                ),
                group(
                    3,
                    1,
                    vec![
                        WordEntry::plain(Spellings::uniform("learned", "learnt")),
                        WordEntry::plain(Spellings::uniform("dreamed", "dreamt")),
                    ],
                ),
                group(
                    4,
                    1,
                    vec![
                        WordEntry::plain(Spellings::uniform("catalog", "catalogue")),
                        WordEntry::plain(Spellings::uniform("dialog", "dialogue")),
                    ],
                ),
                group(
                    5,
                    2,
                    vec![WordEntry::plain(Spellings::new(
                        "tire",
                        ["tire", "tyre", "tyre", "tyre"],
                    ))],
                ),
                group(
                    6,
                    2,
                    vec![WordEntry::plain(Spellings::new(
                        "colorize",
                        ["colourize", "colourise", "colourise", "colourise"],
                    ))],
                ),
                group(
                    7,
                    3,
                    vec![WordEntry::noted(
                        Spellings::uniform("program", "program"),
                        "computer program",
                    )],
                ),
                group(
                    8,
                    3,
                    vec![WordEntry::noted(
                        Spellings::new("program", ["program", "programme", "program", "programme"]),
                        "concert program",
                    )],
                ),
            ],
        }
    }

    /// Load a word bank from a TOML file and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting bank fails [`WordBank::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::ConfigValidation {
                message: format!("word bank file not found: {}", path.display()),
            });
        }

        debug!("Loading word bank from {}", path.display());
        let bank: Self = Figment::from(Toml::file(path)).extract()?;
        bank.validate()?;
        Ok(bank)
    }

    /// Check that the bank can produce a quiz.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no groups, a group has no words, or a
    /// group's level has no description.
    pub fn validate(&self) -> Result<()> {
        if self.groups.is_empty() {
            return Err(Error::invalid_word_bank("no word groups defined"));
        }

        let described: HashSet<u8> = self.levels.iter().map(|l| l.level).collect();
        for group in &self.groups {
            if group.words.is_empty() {
                return Err(Error::invalid_word_bank(format!(
                    "group '{}' has no words",
                    group.name
                )));
            }
            if !described.contains(&group.level) {
                return Err(Error::invalid_word_bank(format!(
                    "group '{}' uses level {} which has no description",
                    group.name, group.level
                )));
            }
        }

        Ok(())
    }

    /// Level descriptions keyed by level number.
    #[must_use]
    pub fn level_descriptions(&self) -> BTreeMap<u8, String> {
        self.levels
            .iter()
            .map(|l| (l.level, l.description.clone()))
            .collect()
    }

    /// Total number of words across all groups.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.groups.iter().map(|g| g.words.len()).sum()
    }
}

impl Default for WordBank {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::quiz::Country;

    #[test]
    fn test_builtin_is_valid() {
        let bank = WordBank::builtin();
        assert!(bank.validate().is_ok());
        assert_eq!(bank.groups.len(), 8);
        assert_eq!(bank.word_count(), 11);
    }

    #[test]
    fn test_builtin_levels() {
        let bank = WordBank::builtin();
        let levels: Vec<u8> = bank.groups.iter().map(|g| g.level).collect();
        assert_eq!(levels, vec![1, 1, 1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn test_builtin_level_one_words_agree_outside_us() {
        let bank = WordBank::builtin();
        for group in bank.groups.iter().filter(|g| g.level == 1) {
            for word in &group.words {
                let ca = word.spellings.get(Country::Ca);
                assert_ne!(word.spellings.us, ca);
                for country in [Country::Gb, Country::Au, Country::Nz] {
                    assert_eq!(word.spellings.get(country), ca);
                }
            }
        }
    }

    #[test]
    fn test_builtin_concert_programme() {
        let bank = WordBank::builtin();
        let concert = &bank.groups[7].words[0];
        assert_eq!(concert.note.as_deref(), Some("concert program"));
        assert_eq!(concert.spellings.gb, "programme");
        assert_eq!(concert.spellings.au, "program");
        assert_eq!(concert.spellings.nz, "programme");
    }

    #[test]
    fn test_level_descriptions_serialize_with_string_keys() {
        let map = WordBank::builtin().level_descriptions();
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(
            json["1"],
            "Words spelled the same in every country other than the US"
        );
        assert_eq!(json["3"], "Words spelled differently depending on context");
    }

    #[test]
    fn test_validate_rejects_empty_bank() {
        let bank = WordBank {
            levels: Vec::new(),
            groups: Vec::new(),
        };
        let err = bank.validate().unwrap_err();
        assert!(err.to_string().contains("no word groups"));
    }

    #[test]
    fn test_validate_rejects_empty_group() {
        let mut bank = WordBank::builtin();
        bank.groups[2].words.clear();
        let err = bank.validate().unwrap_err();
        assert!(err.to_string().contains("Group 3"));
    }

    #[test]
    fn test_validate_rejects_undescribed_level() {
        let mut bank = WordBank::builtin();
        bank.groups[0].level = 9;
        let err = bank.validate().unwrap_err();
        assert!(err.to_string().contains("level 9"));
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[[levels]]
level = 2
description = "Tricky ones"

[[groups]]
name = "Tyres"
level = 2

[[groups.words]]
us = "tire"
ca = "tire"
gb = "tyre"
au = "tyre"
nz = "tyre"
note = "on a car"
"#
        )
        .unwrap();

        let bank = WordBank::load(file.path()).unwrap();
        assert_eq!(bank.groups.len(), 1);
        assert_eq!(bank.groups[0].words[0].spellings.gb, "tyre");
        assert_eq!(bank.groups[0].words[0].note.as_deref(), Some("on a car"));
        assert_eq!(bank.level_descriptions()[&2], "Tricky ones");
    }

    #[test]
    fn test_load_missing_file() {
        let err = WordBank::load("/nonexistent/words.toml").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_rejects_invalid_bank() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
levels = []

[[groups]]
name = "Empty"
level = 1
words = []
"#
        )
        .unwrap();

        let err = WordBank::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidWordBank { .. }));
    }
}
