use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tracing::warn;

use crate::models::user_models::Identity;
use crate::state::AppState;
use crate::utils::error::AppError;

/// Resolves the bearer token into an [`Identity`] request extension.
pub async fn jwt_auth(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(token)) = bearer.ok_or_else(|| {
        warn!(path = %req.uri().path(), "request without bearer token");
        AppError::AuthenticationError("No token found".to_string())
    })?;

    let claims = state.sessions.verify_token(token.token()).map_err(|e| {
        warn!(path = %req.uri().path(), "rejected bearer token");
        e
    })?;

    req.extensions_mut().insert(Identity::from(claims));

    Ok(next.run(req).await)
}
