use axum::{
    extract::{Path, State},
    Json,
};

use crate::models::poll_models::PollView;
use crate::services::poll_engine;
use crate::state::AppState;
use crate::utils::error::AppResult;

pub async fn get_all_polls(State(state): State<AppState>) -> AppResult<Json<Vec<PollView>>> {
    let polls = poll_engine::list_polls(state.polls.as_ref()).await?;
    Ok(Json(polls.into_iter().map(PollView::from).collect()))
}

pub async fn get_poll(
    Path(poll_id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Json<PollView>> {
    let poll = poll_engine::get_poll(state.polls.as_ref(), &poll_id).await?;
    Ok(Json(PollView::from(poll)))
}
