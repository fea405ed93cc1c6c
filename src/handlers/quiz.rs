// src/handlers/quiz.rs

use std::collections::{BTreeSet, HashMap};

use axum::{
    Extension, Form, Json,
    extract::{Path, State, rejection::FormRejection},
    response::{IntoResponse, Response},
};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    error::{AppError, see_other},
    services::{catalog, scoring},
    utils::jwt::Claims,
};

/// Lists every quiz (newest `date_of_quiz` first) with the ids the caller has attempted.
pub async fn dashboard(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let quizzes = catalog::list_quizzes(&pool).await?;

    let attempted_quiz_ids: BTreeSet<i64> =
        sqlx::query_scalar::<_, i64>("SELECT DISTINCT quiz_id FROM scores WHERE user_id = ?")
            .bind(user_id)
            .fetch_all(&pool)
            .await?
            .into_iter()
            .collect();

    Ok(Json(json!({
        "quizzes": quizzes,
        "attempted_quiz_ids": attempted_quiz_ids,
    })))
}

/// Entry gate of the attempt flow: the quiz and its questions, without answers.
/// Quizzes without questions redirect back to the dashboard.
pub async fn start_quiz(
    State(pool): State<SqlitePool>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(catalog::attempt_view(&pool, quiz_id).await?))
}

/// Quiz details (subject, chapter, date, duration, question count).
/// Unlike the attempt flow this works for empty quizzes too.
pub async fn view_quiz(
    State(pool): State<SqlitePool>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(catalog::get_quiz(&pool, quiz_id).await?))
}

type AnswerForm = Result<Form<HashMap<String, String>>, FormRejection>;

/// An unreadable or missing body is graded as an empty submission.
fn answers_or_empty(form: AnswerForm) -> HashMap<String, String> {
    match form {
        Ok(Form(answers)) => answers,
        Err(rejection) => {
            tracing::debug!("Unreadable answer form, grading as empty: {}", rejection);
            HashMap::new()
        }
    }
}

/// Grades the in-page attempt form and returns to the dashboard.
pub async fn attempt_quiz(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<i64>,
    form: AnswerForm,
) -> Result<Response, AppError> {
    let form = answers_or_empty(form);
    let result = scoring::submit_attempt(&pool, claims.user_id()?, quiz_id, &form).await?;
    Ok(see_other("/dashboard", result))
}

/// Grades `question_<id>` form answers, stores the score and sends the
/// caller to their score list.
pub async fn submit_quiz(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<i64>,
    form: AnswerForm,
) -> Result<Response, AppError> {
    let form = answers_or_empty(form);
    let result = scoring::submit_attempt(&pool, claims.user_id()?, quiz_id, &form).await?;
    Ok(see_other("/scores", result))
}
