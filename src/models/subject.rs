// src/models/subject.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::validate_not_blank;

/// Represents the 'subjects' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,

    /// Unique display name (e.g., "Mathematics").
    pub name: String,

    pub description: Option<String>,

    pub date_added: chrono::DateTime<chrono::Utc>,
}

/// `{id, name}` pair used to populate cascading selectors.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NamedItem {
    pub id: i64,
    pub name: String,
}

/// DTO for creating or replacing a subject.
#[derive(Debug, Deserialize, Validate)]
pub struct SubjectRequest {
    #[validate(
        custom(function = validate_not_blank, message = "Subject name is required."),
        length(max = 100)
    )]
    pub name: String,
    #[validate(
        custom(function = validate_not_blank, message = "Description is required."),
        length(max = 5000)
    )]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_name_is_rejected() {
        let request = SubjectRequest {
            name: "   ".to_string(),
            description: "Numbers".to_string(),
        };
        assert!(request.validate().is_err());

        let request = SubjectRequest {
            name: "Math".to_string(),
            description: "Numbers".to_string(),
        };
        assert!(request.validate().is_ok());
    }
}
