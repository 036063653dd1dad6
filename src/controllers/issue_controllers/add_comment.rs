use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::controllers::issue_controllers::models::AddCommentRequest;
use crate::models::issue_models::IssueView;
use crate::services::issue_tracker;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

pub async fn add_comment(
    Path(issue_id): Path<String>,
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<AddCommentRequest>, AppError>,
) -> AppResult<Json<IssueView>> {
    let issue = issue_tracker::add_comment(
        state.issues.as_ref(),
        state.users.as_ref(),
        &issue_id,
        &payload.text,
        &payload.created_by,
    )
    .await?;

    Ok(Json(issue))
}
