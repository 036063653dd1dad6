use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::controllers::poll_controllers::models::CreatePollRequest;
use crate::models::{poll_models::PollView, user_models::Identity};
use crate::services::poll_engine;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::policy::{authorize, Operation};

pub async fn create_poll(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Json(payload), _): WithRejection<Json<CreatePollRequest>, AppError>,
) -> AppResult<(StatusCode, Json<PollView>)> {
    authorize(&identity, Operation::CreatePoll)?;

    let created_by = payload
        .created_by
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| identity.user_id.clone());

    let poll = poll_engine::create_poll(
        state.polls.as_ref(),
        &payload.question,
        &payload.options,
        &created_by,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(PollView::from(poll))))
}
