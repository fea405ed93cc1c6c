// src/services/catalog.rs

//! Read queries over the subject → chapter → quiz hierarchy.

use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{
        question::{PublicQuestion, Question},
        quiz::{QuizAttemptView, QuizOverview},
        subject::NamedItem,
    },
};

const QUIZ_OVERVIEW_SELECT: &str = r#"
    SELECT
        q.id,
        q.subject_id,
        s.name AS subject_name,
        q.chapter_id,
        c.name AS chapter_name,
        q.date_of_quiz,
        q.time_duration,
        (SELECT COUNT(*) FROM questions qu WHERE qu.quiz_id = q.id) AS question_count
    FROM quizzes q
    JOIN subjects s ON s.id = q.subject_id
    JOIN chapters c ON c.id = q.chapter_id
"#;

pub async fn list_subjects(pool: &SqlitePool) -> Result<Vec<NamedItem>, sqlx::Error> {
    sqlx::query_as::<_, NamedItem>("SELECT id, name FROM subjects ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn list_chapters(pool: &SqlitePool, subject_id: i64) -> Result<Vec<NamedItem>, sqlx::Error> {
    sqlx::query_as::<_, NamedItem>("SELECT id, name FROM chapters WHERE subject_id = ? ORDER BY id")
        .bind(subject_id)
        .fetch_all(pool)
        .await
}

/// All quizzes, most recent `date_of_quiz` first.
pub async fn list_quizzes(pool: &SqlitePool) -> Result<Vec<QuizOverview>, sqlx::Error> {
    let sql = format!("{QUIZ_OVERVIEW_SELECT} ORDER BY q.date_of_quiz DESC, q.id DESC");
    sqlx::query_as::<_, QuizOverview>(&sql).fetch_all(pool).await
}

pub async fn list_quizzes_in_chapter(
    pool: &SqlitePool,
    chapter_id: i64,
) -> Result<Vec<QuizOverview>, sqlx::Error> {
    let sql = format!("{QUIZ_OVERVIEW_SELECT} WHERE q.chapter_id = ? ORDER BY q.id");
    sqlx::query_as::<_, QuizOverview>(&sql)
        .bind(chapter_id)
        .fetch_all(pool)
        .await
}

pub async fn recent_quizzes(pool: &SqlitePool, limit: i64) -> Result<Vec<QuizOverview>, sqlx::Error> {
    let sql = format!("{QUIZ_OVERVIEW_SELECT} ORDER BY q.id DESC LIMIT ?");
    sqlx::query_as::<_, QuizOverview>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await
}

pub async fn find_quiz(pool: &SqlitePool, quiz_id: i64) -> Result<Option<QuizOverview>, sqlx::Error> {
    let sql = format!("{QUIZ_OVERVIEW_SELECT} WHERE q.id = ?");
    sqlx::query_as::<_, QuizOverview>(&sql)
        .bind(quiz_id)
        .fetch_optional(pool)
        .await
}

/// Like [`find_quiz`] but maps a missing quiz to a 404.
pub async fn get_quiz(pool: &SqlitePool, quiz_id: i64) -> Result<QuizOverview, AppError> {
    find_quiz(pool, quiz_id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))
}

pub async fn quiz_questions(pool: &SqlitePool, quiz_id: i64) -> Result<Vec<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, quiz_id, statement, option1, option2, option3, option4, correct_option
        FROM questions
        WHERE quiz_id = ?
        ORDER BY id
        "#,
    )
    .bind(quiz_id)
    .fetch_all(pool)
    .await
}

/// Loads a quiz for attempting.
///
/// A quiz without questions cannot be attempted: the caller is sent back to
/// the dashboard instead of receiving an empty form.
pub async fn attempt_view(pool: &SqlitePool, quiz_id: i64) -> Result<QuizAttemptView, AppError> {
    let quiz = get_quiz(pool, quiz_id).await?;
    ensure_attemptable(&quiz)?;

    let questions = quiz_questions(pool, quiz_id)
        .await?
        .into_iter()
        .map(PublicQuestion::from)
        .collect();

    Ok(QuizAttemptView { quiz, questions })
}

pub fn ensure_attemptable(quiz: &QuizOverview) -> Result<(), AppError> {
    if quiz.question_count == 0 {
        return Err(AppError::redirect(
            "/dashboard",
            "This quiz has no questions. You cannot attempt it.",
        ));
    }
    Ok(())
}
