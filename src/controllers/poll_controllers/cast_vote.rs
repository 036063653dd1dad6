use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::controllers::poll_controllers::models::CastVoteRequest;
use crate::models::poll_models::PollView;
use crate::services::poll_engine;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

pub async fn cast_vote(
    Path((poll_id, option_index)): Path<(String, String)>,
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CastVoteRequest>, AppError>,
) -> AppResult<Json<PollView>> {
    let option_index = option_index
        .parse::<usize>()
        .map_err(|_| AppError::ValidationError("Invalid option index".to_string()))?;

    let poll = poll_engine::vote(
        state.polls.as_ref(),
        &poll_id,
        option_index,
        payload.user_id.as_deref(),
    )
    .await?;

    Ok(Json(PollView::from(poll)))
}
