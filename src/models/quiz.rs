// src/models/quiz.rs

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::question::PublicQuestion;

/// `HH:MM`, hours 0-99.
static TIME_DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}:[0-5]\d$").expect("time duration pattern"));

/// Represents the 'quizzes' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,
    pub subject_id: i64,
    pub chapter_id: i64,
    pub date_of_quiz: NaiveDate,

    /// Allowed duration as `HH:MM`. Stored only, not enforced.
    pub time_duration: String,
}

/// Quiz row joined with its subject, chapter and question count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizOverview {
    pub id: i64,
    pub subject_id: i64,
    pub subject_name: String,
    pub chapter_id: i64,
    pub chapter_name: String,
    pub date_of_quiz: NaiveDate,
    pub time_duration: String,
    pub question_count: i64,
}

/// A quiz as presented to someone attempting it.
#[derive(Debug, Serialize)]
pub struct QuizAttemptView {
    pub quiz: QuizOverview,
    pub questions: Vec<PublicQuestion>,
}

/// `{id, title}` pair for the chapter → quiz selector.
#[derive(Debug, Serialize)]
pub struct QuizTitle {
    pub id: i64,
    pub title: String,
}

impl QuizTitle {
    pub fn from_overview(quiz: &QuizOverview) -> Self {
        Self {
            id: quiz.id,
            title: format!("{} - {}", quiz.chapter_name, quiz.date_of_quiz),
        }
    }
}

/// DTO for creating or replacing a quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct QuizRequest {
    pub subject_id: i64,
    pub chapter_id: i64,
    pub date_of_quiz: NaiveDate,
    #[validate(custom(function = validate_time_duration))]
    pub time_duration: String,
}

fn validate_time_duration(value: &str) -> Result<(), validator::ValidationError> {
    if !TIME_DURATION_RE.is_match(value) {
        return Err(validator::ValidationError::new("time_duration_must_be_hh_mm"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_duration_accepts_hh_mm_only() {
        assert!(validate_time_duration("00:30").is_ok());
        assert!(validate_time_duration("1:05").is_ok());
        assert!(validate_time_duration("30").is_err());
        assert!(validate_time_duration("00:75").is_err());
        assert!(validate_time_duration("abc").is_err());
    }

    #[test]
    fn title_combines_chapter_and_date() {
        let overview = QuizOverview {
            id: 7,
            subject_id: 1,
            subject_name: "Math".to_string(),
            chapter_id: 2,
            chapter_name: "Algebra".to_string(),
            date_of_quiz: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            time_duration: "00:30".to_string(),
            question_count: 3,
        };
        let title = QuizTitle::from_overview(&overview);
        assert_eq!(title.id, 7);
        assert_eq!(title.title, "Algebra - 2024-03-01");
    }
}
