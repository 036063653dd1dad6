use axum::{
    extract::{Path, State},
    Json,
};

use crate::models::poll_models::PollTally;
use crate::services::poll_engine;
use crate::state::AppState;
use crate::utils::error::AppResult;

pub async fn get_results(
    Path(poll_id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Json<PollTally>> {
    let poll = poll_engine::get_poll(state.polls.as_ref(), &poll_id).await?;
    Ok(Json(poll_engine::tally_of(&poll)))
}
