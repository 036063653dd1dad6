use serde::Deserialize;

use crate::models::issue_models::{IssueFilter, IssueStatus, Priority};
use crate::utils::error::{AppError, AppResult};

/// Any `status` sent here is ignored; new issues always start Pending.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RaiseIssueRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Option<String>,
    #[serde(default)]
    pub raised_by: String,
}

impl RaiseIssueRequest {
    pub fn priority(&self) -> AppResult<Priority> {
        match self.priority.as_deref().map(str::trim) {
            None | Some("") => Ok(Priority::default()),
            Some(raw) => raw.parse().map_err(AppError::ValidationError),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentRequest {
    pub text: String,
    #[serde(default)]
    pub created_by: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct IssueQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
}

impl IssueQuery {
    pub fn into_filter(self) -> AppResult<IssueFilter> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<IssueStatus>().map_err(AppError::ValidationError)?),
        };
        let priority = match self.priority.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<Priority>().map_err(AppError::ValidationError)?),
        };
        Ok(IssueFilter { status, priority })
    }
}
