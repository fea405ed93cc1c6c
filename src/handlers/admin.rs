// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::{Sqlite, SqlitePool, Transaction};
use validator::Validate;

use crate::{
    error::{AppError, map_write_error},
    models::{
        chapter::{Chapter, ChapterRequest},
        question::{Question, QuestionRequest},
        quiz::{Quiz, QuizRequest},
        subject::{Subject, SubjectRequest},
        user::User,
    },
    services::{analytics, catalog},
    utils::{html::clean_html, jwt::Claims},
};

const SUBJECT_COLUMNS: &str = "id, name, description, date_added";
const QUIZ_COLUMNS: &str = "id, subject_id, chapter_id, date_of_quiz, time_duration";
const QUESTION_COLUMNS: &str =
    "id, quiz_id, statement, option1, option2, option3, option4, correct_option";

/// Subjects, quizzes and users at a glance.
/// Admin only.
pub async fn dashboard(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let subjects = sqlx::query_as::<_, Subject>(&format!(
        "SELECT {SUBJECT_COLUMNS} FROM subjects ORDER BY id"
    ))
    .fetch_all(&pool)
    .await?;
    let quizzes = catalog::list_quizzes(&pool).await?;
    let users = list_all_users(&pool).await?;

    Ok(Json(json!({
        "subjects": subjects,
        "quizzes": quizzes,
        "users": users,
    })))
}

/// Totals, recent content and per-subject score statistics.
/// Admin only.
pub async fn summary(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let summary = analytics::admin_summary(&pool).await.map_err(|e| {
        tracing::error!("Failed to build admin summary: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(summary))
}

/// Sanitized description; markup that cleans down to nothing is rejected.
fn required_description(raw: &str) -> Result<String, AppError> {
    let description = clean_html(raw);
    if description.is_empty() {
        return Err(AppError::BadRequest("Description is required.".to_string()));
    }
    Ok(description)
}

// ======================== Subjects ========================

pub async fn list_subjects(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let subjects = sqlx::query_as::<_, Subject>(&format!(
        "SELECT {SUBJECT_COLUMNS} FROM subjects ORDER BY id"
    ))
    .fetch_all(&pool)
    .await?;

    Ok(Json(subjects))
}

async fn find_subject(pool: &SqlitePool, id: i64) -> Result<Subject, AppError> {
    sqlx::query_as::<_, Subject>(&format!("SELECT {SUBJECT_COLUMNS} FROM subjects WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Subject not found".to_string()))
}

pub async fn get_subject(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(find_subject(&pool, id).await?))
}

/// Creates a subject.
/// Admin only. Rejects an identical name+description pair and duplicate names.
pub async fn create_subject(
    State(pool): State<SqlitePool>,
    Json(payload): Json<SubjectRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let name = payload.name.trim();
    let description = required_description(&payload.description)?;

    let existing: Option<i64> =
        sqlx::query_scalar::<_, i64>("SELECT id FROM subjects WHERE name = ? AND description = ?")
            .bind(name)
            .bind(&description)
            .fetch_optional(&pool)
            .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Subject already exists!".to_string()));
    }

    let subject = sqlx::query_as::<_, Subject>(&format!(
        "INSERT INTO subjects (name, description, date_added) VALUES (?, ?, ?) RETURNING {SUBJECT_COLUMNS}"
    ))
    .bind(name)
    .bind(&description)
    .bind(chrono::Utc::now())
    .fetch_one(&pool)
    .await
    .map_err(|e| map_write_error(e, format!("Subject '{}' already exists", name)))?;

    tracing::info!(subject_id = subject.id, "Subject created");

    Ok((StatusCode::CREATED, Json(subject)))
}

/// Renames or re-describes a subject.
/// Admin only.
pub async fn update_subject(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<SubjectRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let name = payload.name.trim();
    let description = required_description(&payload.description)?;
    let result = sqlx::query("UPDATE subjects SET name = ?, description = ? WHERE id = ?")
        .bind(name)
        .bind(&description)
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| map_write_error(e, format!("Subject '{}' already exists", name)))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Subject not found".to_string()));
    }

    Ok(Json(find_subject(&pool, id).await?))
}

/// Deletes a subject together with its chapters, quizzes, questions and scores.
/// Admin only.
pub async fn delete_subject(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM subjects WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete subject: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Subject not found".to_string()));
    }

    tracing::info!(subject_id = id, "Subject deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ======================== Chapters ========================

/// Chapters of a subject.
/// Admin only.
pub async fn list_chapters(
    State(pool): State<SqlitePool>,
    Path(subject_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let subject = find_subject(&pool, subject_id).await?;
    let chapters = sqlx::query_as::<_, Chapter>(
        "SELECT id, subject_id, name, description FROM chapters WHERE subject_id = ? ORDER BY id",
    )
    .bind(subject_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(json!({ "subject": subject, "chapters": chapters })))
}

/// `{"chapters": [{id, name}]}` for the quiz form's chapter selector.
pub async fn get_chapters(
    State(pool): State<SqlitePool>,
    Path(subject_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let chapters = catalog::list_chapters(&pool, subject_id).await?;
    Ok(Json(json!({ "chapters": chapters })))
}

pub async fn create_chapter(
    State(pool): State<SqlitePool>,
    Path(subject_id): Path<i64>,
    Json(payload): Json<ChapterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let description = required_description(&payload.description)?;
    find_subject(&pool, subject_id).await?;

    let chapter = sqlx::query_as::<_, Chapter>(
        r#"
        INSERT INTO chapters (subject_id, name, description)
        VALUES (?, ?, ?)
        RETURNING id, subject_id, name, description
        "#,
    )
    .bind(subject_id)
    .bind(payload.name.trim())
    .bind(&description)
    .fetch_one(&pool)
    .await
    .map_err(|e| map_write_error(e, "Chapter already exists"))?;

    Ok((StatusCode::CREATED, Json(chapter)))
}

pub async fn update_chapter(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<ChapterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let description = required_description(&payload.description)?;

    let chapter = sqlx::query_as::<_, Chapter>(
        r#"
        UPDATE chapters SET name = ?, description = ?
        WHERE id = ?
        RETURNING id, subject_id, name, description
        "#,
    )
    .bind(payload.name.trim())
    .bind(&description)
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Chapter not found".to_string()))?;

    Ok(Json(chapter))
}

pub async fn delete_chapter(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM chapters WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Chapter not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

// ======================== Quizzes ========================

pub async fn list_quizzes(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(catalog::list_quizzes(&pool).await?))
}

/// A quiz with its questions, answers included.
/// Admin only.
pub async fn get_quiz(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = catalog::get_quiz(&pool, id).await?;
    let questions = catalog::quiz_questions(&pool, id).await?;

    Ok(Json(json!({ "quiz": quiz, "questions": questions })))
}

/// Both ids must exist and the chapter must belong to the subject.
async fn check_quiz_placement(
    tx: &mut Transaction<'_, Sqlite>,
    payload: &QuizRequest,
) -> Result<(), AppError> {
    let owner: Option<i64> = sqlx::query_scalar::<_, i64>("SELECT subject_id FROM chapters WHERE id = ?")
        .bind(payload.chapter_id)
        .fetch_optional(&mut **tx)
        .await?;

    match owner {
        None => Err(AppError::BadRequest("Chapter does not exist".to_string())),
        Some(subject_id) if subject_id != payload.subject_id => Err(AppError::BadRequest(
            "Chapter does not belong to the selected subject".to_string(),
        )),
        Some(_) => Ok(()),
    }
}

pub async fn create_quiz(
    State(pool): State<SqlitePool>,
    Json(payload): Json<QuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut tx = pool.begin().await?;
    check_quiz_placement(&mut tx, &payload).await?;

    let quiz = sqlx::query_as::<_, Quiz>(&format!(
        r#"
        INSERT INTO quizzes (subject_id, chapter_id, date_of_quiz, time_duration)
        VALUES (?, ?, ?, ?)
        RETURNING {QUIZ_COLUMNS}
        "#
    ))
    .bind(payload.subject_id)
    .bind(payload.chapter_id)
    .bind(payload.date_of_quiz)
    .bind(&payload.time_duration)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| map_write_error(e, "Quiz already exists"))?;

    tx.commit().await?;
    tracing::info!(quiz_id = quiz.id, "Quiz created");

    Ok((StatusCode::CREATED, Json(quiz)))
}

pub async fn update_quiz(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<QuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut tx = pool.begin().await?;
    check_quiz_placement(&mut tx, &payload).await?;

    let quiz = sqlx::query_as::<_, Quiz>(&format!(
        r#"
        UPDATE quizzes
        SET subject_id = ?, chapter_id = ?, date_of_quiz = ?, time_duration = ?
        WHERE id = ?
        RETURNING {QUIZ_COLUMNS}
        "#
    ))
    .bind(payload.subject_id)
    .bind(payload.chapter_id)
    .bind(payload.date_of_quiz)
    .bind(&payload.time_duration)
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    tx.commit().await?;

    Ok(Json(quiz))
}

/// Deletes a quiz with its questions and scores.
/// Admin only.
pub async fn delete_quiz(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM quizzes WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    tracing::info!(quiz_id = id, "Quiz deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ======================== Questions ========================

/// Adds a question to a quiz.
/// Admin only. All fields are required and `correct_option` must be 1-4.
pub async fn create_question(
    State(pool): State<SqlitePool>,
    Path(quiz_id): Path<i64>,
    Json(mut payload): Json<QuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    payload.normalize();
    catalog::get_quiz(&pool, quiz_id).await?;

    let question = sqlx::query_as::<_, Question>(&format!(
        r#"
        INSERT INTO questions
        (quiz_id, statement, option1, option2, option3, option4, correct_option)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING {QUESTION_COLUMNS}
        "#
    ))
    .bind(quiz_id)
    .bind(&payload.statement)
    .bind(&payload.option1)
    .bind(&payload.option2)
    .bind(&payload.option3)
    .bind(&payload.option4)
    .bind(payload.correct_option)
    .fetch_one(&pool)
    .await
    .map_err(|e| map_write_error(e, "Question already exists"))?;

    Ok((StatusCode::CREATED, Json(question)))
}

/// Replaces a question's text, options and answer.
/// Admin only.
pub async fn update_question(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(mut payload): Json<QuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    payload.normalize();

    let question = sqlx::query_as::<_, Question>(&format!(
        r#"
        UPDATE questions
        SET statement = ?, option1 = ?, option2 = ?, option3 = ?, option4 = ?, correct_option = ?
        WHERE id = ?
        RETURNING {QUESTION_COLUMNS}
        "#
    ))
    .bind(&payload.statement)
    .bind(&payload.option1)
    .bind(&payload.option2)
    .bind(&payload.option3)
    .bind(&payload.option4)
    .bind(payload.correct_option)
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Question not found".to_string()))?;

    Ok(Json(question))
}

/// Deletes a quiz question by ID.
/// Admin only.
pub async fn delete_question(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM questions WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete question: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

// ======================== Users ========================

async fn list_all_users(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, email, password, full_name, qualification, dob, role FROM users ORDER BY id DESC",
    )
    .fetch_all(pool)
    .await
}

/// Lists all users in the system.
/// Admin only.
pub async fn list_users(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let users = list_all_users(&pool).await.map_err(|e| {
        tracing::error!("Failed to list users: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(users))
}

/// Deletes a user and their scores.
/// Admin only. Prevents deleting self.
pub async fn delete_user(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if id == claims.user_id()? {
        return Err(AppError::BadRequest("Cannot delete yourself".to_string()));
    }

    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete user: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
