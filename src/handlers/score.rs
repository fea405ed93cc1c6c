// src/handlers/score.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{error::AppError, services::analytics, utils::jwt::Claims};

/// The caller's scores, newest first, with their trend.
pub async fn list_scores(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(analytics::score_history(&pool, claims.user_id()?).await?))
}

/// A single score. Scores owned by someone else are never returned.
pub async fn score_summary(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(score_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = analytics::find_attempt(&pool, score_id)
        .await?
        .ok_or(AppError::NotFound("Score not found".to_string()))?;

    if attempt.user_id != claims.user_id()? {
        tracing::warn!(score_id, user = %claims.sub, "Score requested by non-owner");
        return Err(AppError::redirect("/dashboard", "Unauthorized access"));
    }

    Ok(Json(attempt))
}

/// The caller's attempt dashboard.
pub async fn user_summary(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(analytics::user_summary(&pool, claims.user_id()?).await?))
}
