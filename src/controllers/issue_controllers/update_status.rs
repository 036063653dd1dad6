use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::controllers::issue_controllers::models::UpdateStatusRequest;
use crate::models::issue_models::{IssueStatus, IssueView};
use crate::services::issue_tracker;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

pub async fn update_status(
    Path(issue_id): Path<String>,
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateStatusRequest>, AppError>,
) -> AppResult<Json<IssueView>> {
    let status = payload
        .status
        .trim()
        .parse::<IssueStatus>()
        .map_err(AppError::ValidationError)?;

    let issue = issue_tracker::update_status(
        state.issues.as_ref(),
        state.users.as_ref(),
        &issue_id,
        status,
    )
    .await?;

    Ok(Json(issue))
}
