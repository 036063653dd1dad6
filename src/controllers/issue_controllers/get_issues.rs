use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::controllers::issue_controllers::models::IssueQuery;
use crate::models::issue_models::IssueView;
use crate::services::issue_tracker;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

pub async fn get_all_issues(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<IssueQuery>, AppError>,
) -> AppResult<Json<Vec<IssueView>>> {
    let issues =
        issue_tracker::list_issues(state.issues.as_ref(), state.users.as_ref(), query.into_filter()?)
            .await?;

    Ok(Json(issues))
}

pub async fn get_issue(
    Path(issue_id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Json<IssueView>> {
    let issue = issue_tracker::get_issue(state.issues.as_ref(), state.users.as_ref(), &issue_id).await?;
    Ok(Json(issue))
}
