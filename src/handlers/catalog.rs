// src/handlers/catalog.rs

//! Public `{id, name}` listings that feed the subject → chapter → quiz selectors.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{error::AppError, models::quiz::QuizTitle, services::catalog};

pub async fn list_subjects(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(catalog::list_subjects(&pool).await?))
}

pub async fn list_chapters(
    State(pool): State<SqlitePool>,
    Path(subject_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(catalog::list_chapters(&pool, subject_id).await?))
}

pub async fn list_quizzes(
    State(pool): State<SqlitePool>,
    Path(chapter_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quizzes: Vec<QuizTitle> = catalog::list_quizzes_in_chapter(&pool, chapter_id)
        .await?
        .iter()
        .map(QuizTitle::from_overview)
        .collect();

    Ok(Json(quizzes))
}
