// src/models/mod.rs

pub mod chapter;
pub mod question;
pub mod quiz;
pub mod score;
pub mod subject;
pub mod user;

/// Rejects values that are empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("field_required"));
    }
    Ok(())
}
