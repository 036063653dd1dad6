use axum::{
    routing::{get, post, put},
    Router,
};

use crate::controllers::issue_controllers::{
    add_comment, export_issues, get_issues, raise_issue, update_status,
};
use crate::state::AppState;

pub fn issue_routes(state: AppState) -> Router {
    Router::new()
        .route("/raise", post(raise_issue::raise_issue))
        .route("/all", get(get_issues::get_all_issues))
        .route("/export/excel", get(export_issues::export_excel))
        .route("/export/pdf", get(export_issues::export_pdf))
        .route("/:id", get(get_issues::get_issue))
        .route("/:id/status", put(update_status::update_status))
        .route("/:id/comment", post(add_comment::add_comment))
        .with_state(state)
}
