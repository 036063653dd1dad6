use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;

use crate::controllers::issue_controllers::models::RaiseIssueRequest;
use crate::models::issue_models::IssueView;
use crate::services::issue_tracker::{self, NewIssue};
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

pub async fn raise_issue(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<RaiseIssueRequest>, AppError>,
) -> AppResult<(StatusCode, Json<IssueView>)> {
    let priority = payload.priority()?;

    let issue = issue_tracker::raise_issue(
        state.issues.as_ref(),
        state.users.as_ref(),
        NewIssue {
            title: payload.title,
            description: payload.description,
            priority,
            raised_by: payload.raised_by,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(issue)))
}
