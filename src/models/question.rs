// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

use super::validate_not_blank;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub quiz_id: i64,

    /// The text of the question.
    pub statement: String,

    pub option1: String,
    pub option2: String,
    pub option3: String,
    pub option4: String,

    /// 1-based index of the correct option.
    pub correct_option: i64,
}

/// DTO for sending a question to someone attempting the quiz (excludes the answer).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub statement: String,
    pub options: [String; 4],
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            statement: q.statement,
            options: [q.option1, q.option2, q.option3, q.option4],
        }
    }
}

/// Question id with its correct option, all the grader needs.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct AnswerKey {
    pub id: i64,
    pub correct_option: i64,
}

/// DTO for creating or replacing a question.
#[derive(Debug, Deserialize, Validate)]
pub struct QuestionRequest {
    #[validate(custom(function = validate_not_blank))]
    pub statement: String,
    #[validate(custom(function = validate_not_blank), length(max = 100))]
    pub option1: String,
    #[validate(custom(function = validate_not_blank), length(max = 100))]
    pub option2: String,
    #[validate(custom(function = validate_not_blank), length(max = 100))]
    pub option3: String,
    #[validate(custom(function = validate_not_blank), length(max = 100))]
    pub option4: String,
    #[validate(range(min = 1, max = 4, message = "Correct option must be between 1 and 4."))]
    pub correct_option: i64,
}

impl QuestionRequest {
    /// Trims the statement and every option in place.
    pub fn normalize(&mut self) {
        for field in [
            &mut self.statement,
            &mut self.option1,
            &mut self.option2,
            &mut self.option3,
            &mut self.option4,
        ] {
            *field = field.trim().to_string();
        }
    }
}
