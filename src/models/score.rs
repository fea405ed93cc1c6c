// src/models/score.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::{quiz::QuizOverview, subject::Subject};

/// Represents the 'scores' table: one immutable row per quiz submission.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Score {
    pub id: i64,
    pub quiz_id: i64,
    pub user_id: i64,
    pub timestamp: DateTime<Utc>,
    pub total_scored: i64,
    pub date_attempted: NaiveDate,
}

/// A score joined with the quiz's subject and chapter names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Attempt {
    pub id: i64,
    pub quiz_id: i64,
    pub user_id: i64,
    pub subject_name: String,
    pub chapter_name: String,
    pub timestamp: DateTime<Utc>,
    pub total_scored: i64,
    pub date_attempted: NaiveDate,
    /// Questions currently in the quiz.
    pub question_count: i64,
}

/// Response body of a graded submission.
#[derive(Debug, Serialize)]
pub struct SubmissionResult {
    pub score: Score,
    pub total_questions: i64,
}

/// One point of the per-user score trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    /// `YYYY-MM-DD`
    pub date: String,
    pub score: i64,
}

/// Response body of `GET /scores`.
#[derive(Debug, Serialize)]
pub struct ScoreHistory {
    pub scores: Vec<Attempt>,
    pub score_trend: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct SubjectCount {
    pub subject: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    /// `Mon YYYY`, e.g. `Feb 2024`.
    pub month: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct SubjectTopScore {
    pub subject: String,
    pub top_score: i64,
}

/// The signed-in user's dashboard.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub latest_attempt: Option<Attempt>,
    pub previous_attempts: Vec<Attempt>,
    pub subject_attempts: Vec<SubjectCount>,
    pub monthly_attempts: Vec<MonthCount>,
}

/// The admin dashboard.
#[derive(Debug, Serialize)]
pub struct AdminSummary {
    pub total_subjects: i64,
    pub total_chapters: i64,
    pub total_quizzes: i64,
    pub total_users: i64,
    pub recent_subjects: Vec<Subject>,
    pub recent_quizzes: Vec<QuizOverview>,
    pub top_scores: Vec<SubjectTopScore>,
    pub subject_attempts: Vec<SubjectCount>,
}
