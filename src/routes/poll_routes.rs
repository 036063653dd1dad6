use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::controllers::poll_controllers::{cast_vote, create_poll, get_poll, get_results};
use crate::middleware::jwt::jwt_auth;
use crate::state::AppState;

pub fn poll_routes(state: AppState) -> Router {
    let gated = Router::new()
        .route("/create", post(create_poll::create_poll))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth));

    Router::new()
        .merge(gated)
        .route("/all", get(get_poll::get_all_polls))
        .route("/vote/:pollId/:optionIndex", post(cast_vote::cast_vote))
        .route("/:pollId", get(get_poll::get_poll))
        .route("/:pollId/results", get(get_results::get_results))
        .with_state(state)
}
