// src/models/chapter.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::validate_not_blank;

/// Represents the 'chapters' table. Owned by a subject.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Chapter {
    pub id: i64,
    pub subject_id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// DTO for creating or replacing a chapter.
/// The owning subject comes from the path.
#[derive(Debug, Deserialize, Validate)]
pub struct ChapterRequest {
    #[validate(
        custom(function = validate_not_blank, message = "Chapter name is required."),
        length(max = 100)
    )]
    pub name: String,
    #[validate(
        custom(function = validate_not_blank, message = "Description is required."),
        length(max = 5000)
    )]
    pub description: String,
}
