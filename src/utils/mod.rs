use mongodb::bson::oid::ObjectId;

use crate::utils::error::{AppError, AppResult};

pub mod error;
pub mod export;
pub mod policy;
pub mod session;

pub fn parse_object_id(raw: &str, what: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| AppError::ValidationError(format!("Invalid {} id", what)))
}

/// Trimmed `value`, or a validation error naming `field` when it is blank.
pub fn required_text(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}
