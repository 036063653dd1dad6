use chrono::{DateTime, Utc};
use mongodb::bson;

pub mod issue_models;
pub mod poll_models;
pub mod user_models;

pub fn to_chrono(at: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or_default()
}
