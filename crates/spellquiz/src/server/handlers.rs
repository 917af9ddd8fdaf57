//! Route handlers.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::client_ip::ClientIp;
use super::error::{ApiError, ErrorResponse};
use super::extract::Json;
use super::{AppState, TRACING_TARGET_HANDLER};
use crate::quiz::{check_answers, select_words, AnswerResult, QuizWord, Score, SubmittedAnswer};
use crate::storage::{NewAttempt, QuizStatistics};

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Body of `GET /api/quiz`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResponse {
    /// One word per group.
    pub quiz_data: Vec<QuizWord>,
    /// Level number to description.
    pub level_descriptions: BTreeMap<u8, String>,
}

/// Body of `POST /api/check`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckRequest {
    /// The quiz as it was handed out.
    pub quiz_data: Vec<QuizWord>,
    /// The answers given.
    pub answers: Vec<SubmittedAnswer>,
}

/// Response to `POST /api/check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    /// Per-answer verdicts.
    pub results: Vec<AnswerResult>,
    /// Score of this attempt.
    pub score: Score,
    /// Statistics over all attempts, this one included.
    pub statistics: QuizStatistics,
}

pub(super) async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub(super) async fn get_quiz(State(state): State<AppState>) -> Json<QuizResponse> {
    let bank = state.word_bank();
    let quiz_data = select_words(bank, &mut rand::rng());

    tracing::debug!(
        target: TRACING_TARGET_HANDLER,
        words = quiz_data.len(),
        "Generated quiz"
    );

    Json(QuizResponse {
        quiz_data,
        level_descriptions: bank.level_descriptions(),
    })
}

pub(super) async fn check(
    State(state): State<AppState>,
    ClientIp(ip_address): ClientIp,
    Json(request): Json<CheckRequest>,
) -> Result<Json<CheckResponse>, ApiError> {
    let checked = check_answers(&request.quiz_data, &request.answers)?;
    let score = checked.score;
    let results = checked.results;

    let (attempt_id, results, statistics) = state
        .with_storage(move |storage| {
            let attempt_id = storage.record_attempt(&NewAttempt {
                ip_address: &ip_address,
                timestamp: Utc::now(),
                score,
                answers: &results,
            })?;
            let statistics = storage.statistics()?;
            Ok((attempt_id, results, statistics))
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET_HANDLER,
        attempt_id,
        correct = score.correct,
        total = score.total,
        percentage = score.percentage,
        "Attempt recorded"
    );

    Ok(Json(CheckResponse {
        results,
        score,
        statistics,
    }))
}

pub(super) async fn stats(
    State(state): State<AppState>,
) -> Result<Json<QuizStatistics>, ApiError> {
    let statistics = state.with_storage(|storage| storage.statistics()).await?;
    Ok(Json(statistics))
}

pub(super) async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "not found".to_string(),
        }),
    )
}
