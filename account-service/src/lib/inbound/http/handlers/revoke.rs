use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Explicitly revoke the authenticated user's refresh token. Same
/// effect as logout; kept as a separate endpoint for clients that
/// distinguish the two intents.
pub async fn revoke(
    State(state): State<AppState>,
    Extension(current_user): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<RevokeResponseData>, ApiError> {
    state
        .account_service
        .logout(&current_user.user_id)
        .await
        .map_err(ApiError::from)
        .map(|_| {
            ApiSuccess::new(
                StatusCode::OK,
                RevokeResponseData {
                    message: "Refresh token revoked".to_string(),
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevokeResponseData {
    pub message: String,
}
