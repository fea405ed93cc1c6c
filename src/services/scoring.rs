// src/services/scoring.rs

//! Grades quiz submissions and appends them to the score log.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::{
    error::{AppError, map_write_error},
    models::{
        question::AnswerKey,
        score::{Score, SubmissionResult},
    },
    services::catalog,
};

/// Extracts `question_<id>` (or `question-<id>`) fields from a submitted form.
/// Unrelated fields and non-numeric ids are dropped. When both spellings name
/// the same question, `question_<id>` wins.
pub fn parse_answer_form(form: &HashMap<String, String>) -> HashMap<i64, String> {
    let mut answers = HashMap::new();
    for (key, value) in form {
        if let Some(id) = key.strip_prefix("question_").and_then(|id| id.parse().ok()) {
            answers.insert(id, value.clone());
        } else if let Some(id) = key.strip_prefix("question-").and_then(|id| id.parse().ok()) {
            answers.entry(id).or_insert_with(|| value.clone());
        }
    }
    answers
}

/// Reads a submitted option. Anything other than a plain 1-4 is `None`.
pub fn parse_option(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok().filter(|n| (1..=4).contains(n))
}

/// Counts the questions whose submitted option matches the correct one.
///
/// Missing and malformed answers are simply wrong; answers for questions
/// outside `keys` are ignored.
pub fn grade(keys: &[AnswerKey], submitted: &HashMap<i64, String>) -> i64 {
    keys.iter()
        .filter(|key| {
            submitted
                .get(&key.id)
                .and_then(|raw| parse_option(raw))
                .is_some_and(|chosen| chosen == key.correct_option)
        })
        .count() as i64
}

pub async fn answer_keys(pool: &SqlitePool, quiz_id: i64) -> Result<Vec<AnswerKey>, sqlx::Error> {
    sqlx::query_as::<_, AnswerKey>(
        "SELECT id, correct_option FROM questions WHERE quiz_id = ? ORDER BY id",
    )
    .bind(quiz_id)
    .fetch_all(pool)
    .await
}

/// Appends a new score stamped with the current time.
pub async fn record_attempt(
    pool: &SqlitePool,
    user_id: i64,
    quiz_id: i64,
    total_scored: i64,
) -> Result<Score, sqlx::Error> {
    record_attempt_at(pool, user_id, quiz_id, total_scored, Utc::now()).await
}

/// Appends a new score taken at `at`. Earlier attempts are never touched.
pub async fn record_attempt_at(
    pool: &SqlitePool,
    user_id: i64,
    quiz_id: i64,
    total_scored: i64,
    at: DateTime<Utc>,
) -> Result<Score, sqlx::Error> {
    sqlx::query_as::<_, Score>(
        r#"
        INSERT INTO scores (quiz_id, user_id, timestamp, total_scored, date_attempted)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, quiz_id, user_id, timestamp, total_scored, date_attempted
        "#,
    )
    .bind(quiz_id)
    .bind(user_id)
    .bind(at)
    .bind(total_scored)
    .bind(at.date_naive())
    .fetch_one(pool)
    .await
}

async fn user_exists(pool: &SqlitePool, user_id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

/// Grades a submitted answer form for `quiz_id` and stores the result.
/// A token whose account has been deleted is rejected as unauthenticated.
pub async fn submit_attempt(
    pool: &SqlitePool,
    user_id: i64,
    quiz_id: i64,
    form: &HashMap<String, String>,
) -> Result<SubmissionResult, AppError> {
    if !user_exists(pool, user_id).await? {
        return Err(AppError::AuthError("Account no longer exists".to_string()));
    }

    let quiz = catalog::get_quiz(pool, quiz_id).await?;
    catalog::ensure_attemptable(&quiz)?;

    let keys = answer_keys(pool, quiz_id).await?;
    let total_scored = grade(&keys, &parse_answer_form(form));

    let score = record_attempt(pool, user_id, quiz_id, total_scored)
        .await
        .map_err(|e| map_write_error(e, "Attempt already recorded"))?;

    tracing::info!(
        user_id,
        quiz_id,
        score_id = score.id,
        total_scored,
        "Quiz attempt recorded"
    );

    Ok(SubmissionResult {
        score,
        total_questions: keys.len() as i64,
    })
}
