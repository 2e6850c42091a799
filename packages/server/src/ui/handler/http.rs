//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
};

use crate::{
    domain::{Password, Photo, Username},
    infrastructure::dto::{
        conversion::presence_to_dto,
        http::{ErrorResponse, MessageResponse, PresenceResponse, SignupRequest},
    },
    ui::state::AppState,
    usecase::{AuthError, ClearMessagesError},
};

type ErrorReply = (StatusCode, Json<ErrorResponse>);

fn error_reply(status: StatusCode, error: impl ToString) -> ErrorReply {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

/// Sign up over HTTP
///
/// `201` on success, `409` on a taken username, `400` on invalid input and
/// `500` when storage or hashing fails.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ErrorReply> {
    let username =
        Username::new(request.username).map_err(|e| error_reply(StatusCode::BAD_REQUEST, e))?;
    let password =
        Password::new(request.password).map_err(|e| error_reply(StatusCode::BAD_REQUEST, e))?;

    match state
        .auth_usecase
        .signup(username, password, Photo::new(request.photo))
        .await
    {
        Ok(user) => Ok((
            StatusCode::CREATED,
            Json(MessageResponse {
                message: format!("User '{}' created", user.username),
            }),
        )),
        Err(e @ AuthError::DuplicateUsername(_)) => Err(error_reply(StatusCode::CONFLICT, e)),
        Err(e) => {
            tracing::error!("HTTP signup failed: {}", e);
            Err(error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create user",
            ))
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current presence mapping
pub async fn presence(State(state): State<Arc<AppState>>) -> Json<PresenceResponse> {
    let snapshot = state.presence_usecase.snapshot().await;

    // Domain Model から DTO への変換
    Json(presence_to_dto(snapshot))
}

/// Clear every stored message (`Authorization: Bearer <admin token>`)
pub async fn clear_messages(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode, ErrorReply> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    match state.clear_messages_usecase.execute(token).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e @ ClearMessagesError::Disabled) => Err(error_reply(StatusCode::FORBIDDEN, e)),
        Err(e @ ClearMessagesError::Unauthorized) => Err(error_reply(StatusCode::UNAUTHORIZED, e)),
        Err(e @ ClearMessagesError::Persistence(_)) => {
            tracing::error!("Failed to clear messages: {}", e);
            Err(error_reply(StatusCode::INTERNAL_SERVER_ERROR, e))
        }
    }
}
