//! Answer checking.

use serde::{Deserialize, Serialize};

use super::{Country, QuizWord};
use crate::error::{Error, Result};

/// One answer as submitted by the quiz client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    /// Position of the word in the submitted quiz.
    pub word_index: usize,
    /// Level-1 words take a single answer for all non-US countries.
    #[serde(default)]
    pub is_level1: bool,
    /// The typed answer.
    #[serde(default)]
    pub answer: String,
    /// Which country this answer is for. Ignored for level-1 answers.
    #[serde(default)]
    pub country: Option<String>,
}

/// The verdict on one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    /// Position of the word in the submitted quiz.
    pub word_index: usize,
    /// Whether this was a level-1 answer.
    pub is_level1: bool,
    /// Whether the answer matched.
    pub correct: bool,
    /// Expected spelling; `None` when the answer could not be scored.
    pub correct_answer: Option<String>,
    /// The submitted answer, trimmed.
    pub user_answer: String,
    /// Country the answer was scored against (non-level-1 only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<Country>,
}

impl AnswerResult {
    /// Whether this answer counted toward the score.
    #[must_use]
    pub fn is_scored(&self) -> bool {
        self.correct_answer.is_some()
    }
}

/// Aggregate score of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    /// Number of correct answers.
    pub correct: u32,
    /// Number of scored answers.
    pub total: u32,
    /// `correct / total` as a whole percentage.
    pub percentage: u32,
}

impl Score {
    /// Build a score, rounding the percentage half-to-even.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(correct: u32, total: u32) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            (f64::from(correct) / f64::from(total) * 100.0).round_ties_even() as u32
        };
        Self {
            correct,
            total,
            percentage,
        }
    }

    /// Whether every scored answer was right.
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.percentage == 100
    }
}

/// The outcome of checking a whole submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedQuiz {
    /// Per-answer results, in submission order.
    pub results: Vec<AnswerResult>,
    /// Aggregate score.
    pub score: Score,
}

/// Score `answers` against `quiz`.
///
/// Matching is case-insensitive and ignores surrounding whitespace. A
/// level-1 answer is checked against the Canadian spelling, which all
/// non-US countries share at that level. Other answers are checked against
/// the named country; answers with a missing or unknown country are
/// reported but not scored.
///
/// # Errors
///
/// Returns [`Error::WordIndexOutOfRange`] if an answer refers to a word
/// outside `quiz`.
pub fn check_answers(quiz: &[QuizWord], answers: &[SubmittedAnswer]) -> Result<CheckedQuiz> {
    let mut results = Vec::with_capacity(answers.len());
    let mut correct = 0;
    let mut total = 0;

    for submitted in answers {
        let word = quiz
            .get(submitted.word_index)
            .ok_or(Error::WordIndexOutOfRange {
                word_index: submitted.word_index,
                quiz_len: quiz.len(),
            })?;

        let user_answer = submitted.answer.trim();
        let mut result = AnswerResult {
            word_index: submitted.word_index,
            is_level1: submitted.is_level1,
            correct: false,
            correct_answer: None,
            user_answer: user_answer.to_string(),
            country: None,
        };

        let expected = if submitted.is_level1 {
            Some(word.spellings.get(Country::Ca))
        } else {
            submitted
                .country
                .as_deref()
                .and_then(|code| code.parse::<Country>().ok())
                .map(|country| {
                    result.country = Some(country);
                    word.spellings.get(country)
                })
        };

        if let Some(expected) = expected {
            total += 1;
            result.correct_answer = Some(expected.to_string());
            if user_answer.to_lowercase() == expected.to_lowercase() {
                result.correct = true;
                correct += 1;
            }
        }

        results.push(result);
    }

    Ok(CheckedQuiz {
        results,
        score: Score::new(correct, total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::Spellings;

    fn quiz() -> Vec<QuizWord> {
        vec![
            QuizWord {
                spellings: Spellings::uniform("canceled", "cancelled"),
                note: String::new(),
                level: 1,
            },
            QuizWord {
                spellings: Spellings::new("tire", ["tire", "tyre", "tyre", "tyre"]),
                note: String::new(),
                level: 2,
            },
            QuizWord {
                spellings: Spellings::new("program", ["program", "programme", "program", "programme"]),
                note: "concert program".to_string(),
                level: 3,
            },
        ]
    }

    fn level1(index: usize, answer: &str) -> SubmittedAnswer {
        SubmittedAnswer {
            word_index: index,
            is_level1: true,
            answer: answer.to_string(),
            country: None,
        }
    }

    fn regional(index: usize, country: &str, answer: &str) -> SubmittedAnswer {
        SubmittedAnswer {
            word_index: index,
            is_level1: false,
            answer: answer.to_string(),
            country: Some(country.to_string()),
        }
    }

    #[test]
    fn test_level1_ignores_case_and_whitespace() {
        let checked = check_answers(&quiz(), &[level1(0, "  CanCelled ")]).unwrap();
        let result = &checked.results[0];
        assert!(result.correct);
        assert_eq!(result.correct_answer.as_deref(), Some("cancelled"));
        assert_eq!(result.user_answer, "CanCelled");
        assert!(result.country.is_none());
        assert_eq!(checked.score, Score::new(1, 1));
    }

    #[test]
    fn test_level1_wrong_answer() {
        let checked = check_answers(&quiz(), &[level1(0, "canceled")]).unwrap();
        assert!(!checked.results[0].correct);
        assert_eq!(checked.score.correct, 0);
        assert_eq!(checked.score.total, 1);
        assert_eq!(checked.score.percentage, 0);
    }

    #[test]
    fn test_regional_answers_use_named_country() {
        let answers = [
            regional(1, "ca", "tire"),
            regional(1, "gb", "tyre"),
            regional(2, "au", "programme"),
            regional(2, "nz", "programme"),
        ];
        let checked = check_answers(&quiz(), &answers).unwrap();

        let verdicts: Vec<bool> = checked.results.iter().map(|r| r.correct).collect();
        assert_eq!(verdicts, vec![true, true, false, true]);
        assert_eq!(checked.results[2].correct_answer.as_deref(), Some("program"));
        assert_eq!(checked.results[2].country, Some(Country::Au));
        assert_eq!(checked.score, Score::new(3, 4));
        assert_eq!(checked.score.percentage, 75);
    }

    #[test]
    fn test_unknown_or_missing_country_is_unscored() {
        let mut missing = regional(1, "gb", "tyre");
        missing.country = None;
        let answers = [regional(1, "fr", "tyre"), missing, regional(1, "note", "")];

        let checked = check_answers(&quiz(), &answers).unwrap();
        for result in &checked.results {
            assert!(!result.correct);
            assert!(!result.is_scored());
            assert!(result.country.is_none());
        }
        assert_eq!(checked.score, Score::new(0, 0));
        assert_eq!(checked.score.percentage, 0);
    }

    #[test]
    fn test_level1_flag_overrides_country() {
        let mut answer = regional(1, "gb", "tire");
        answer.is_level1 = true;
        let checked = check_answers(&quiz(), &[answer]).unwrap();
        assert!(checked.results[0].correct);
        assert!(checked.results[0].country.is_none());
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        let err = check_answers(&quiz(), &[level1(3, "x")]).unwrap_err();
        assert!(matches!(
            err,
            Error::WordIndexOutOfRange {
                word_index: 3,
                quiz_len: 3
            }
        ));
    }

    #[test]
    fn test_empty_submission() {
        let checked = check_answers(&quiz(), &[]).unwrap();
        assert!(checked.results.is_empty());
        assert_eq!(checked.score, Score::default());
    }

    #[test]
    fn test_percentage_rounds_half_to_even() {
        assert_eq!(Score::new(1, 8).percentage, 12);
        assert_eq!(Score::new(3, 8).percentage, 38);
        assert_eq!(Score::new(2, 3).percentage, 67);
        assert_eq!(Score::new(1, 3).percentage, 33);
        assert_eq!(Score::new(5, 5).percentage, 100);
        assert!(Score::new(5, 5).is_perfect());
    }

    #[test]
    fn test_answer_result_wire_shape() {
        let checked =
            check_answers(&quiz(), &[regional(1, "gb", "Tyre"), regional(1, "xx", "")]).unwrap();
        let json = serde_json::to_value(&checked.results).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {
                    "wordIndex": 1,
                    "isLevel1": false,
                    "correct": true,
                    "correctAnswer": "tyre",
                    "userAnswer": "Tyre",
                    "country": "gb"
                },
                {
                    "wordIndex": 1,
                    "isLevel1": false,
                    "correct": false,
                    "correctAnswer": null,
                    "userAnswer": ""
                }
            ])
        );
    }

    #[test]
    fn test_submitted_answer_defaults() {
        let answer: SubmittedAnswer = serde_json::from_str(r#"{"wordIndex": 4}"#).unwrap();
        assert_eq!(answer.word_index, 4);
        assert!(!answer.is_level1);
        assert!(answer.answer.is_empty());
        assert!(answer.country.is_none());
    }
}
