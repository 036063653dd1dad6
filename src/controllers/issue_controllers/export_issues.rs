use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};

use crate::services::issue_tracker;
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::export::ExportFormat;

async fn export(state: AppState, format: ExportFormat) -> AppResult<Response> {
    // Fully rendered before any header goes out.
    let bytes =
        issue_tracker::export_snapshot(state.issues.as_ref(), state.users.as_ref(), format).await?;

    let disposition = format!("attachment; filename=\"{}\"", format.file_name());
    Ok((
        [
            (CONTENT_TYPE, format.content_type().to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

pub async fn export_excel(State(state): State<AppState>) -> AppResult<Response> {
    export(state, ExportFormat::Tabular).await
}

pub async fn export_pdf(State(state): State<AppState>) -> AppResult<Response> {
    export(state, ExportFormat::Document).await
}
