//! Axum Handlers for the REST API
//!
//! This module contains the logic for handling the mission conversation
//! endpoints. It uses `utoipa` doc comments to generate OpenAPI
//! documentation.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use lingua_core::runtime::ConversationError;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use crate::{
    models::{
        ConversePayload, ConverseResponse, ErrorResponse, EvaluatePayload, EvaluationResponse,
        SessionDiagnostics,
    },
    state::AppState,
};

pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Forbidden(String),
    BadGateway(String),
    InternalServerError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { message })).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse { message })).into_response()
            }
            ApiError::Forbidden(message) => {
                (StatusCode::FORBIDDEN, Json(ErrorResponse { message })).into_response()
            }
            ApiError::BadGateway(message) => {
                (StatusCode::BAD_GATEWAY, Json(ErrorResponse { message })).into_response()
            }
            ApiError::InternalServerError(err) => {
                error!("Internal Server Error: {:?}", err);
                let message = "An internal server error occurred.".to_string();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { message }),
                )
                    .into_response()
            }
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::InternalServerError(err.into())
    }
}

impl ApiError {
    /// Maps runtime failures to HTTP responses. Retries are always the
    /// caller's decision, so each condition is surfaced as-is.
    fn from_conversation(err: ConversationError) -> Self {
        match err {
            ConversationError::SessionNotFound(id) => {
                ApiError::NotFound(format!("Session '{}' not found", id))
            }
            ConversationError::Unauthorized => ApiError::Forbidden(
                "Session does not belong to this user and mission".to_string(),
            ),
            ConversationError::EvaluationFailed(reason) => {
                ApiError::BadGateway(format!("Evaluation produced no usable report: {}", reason))
            }
            ConversationError::Generation(err) => {
                error!("Generation call failed: {:?}", err);
                ApiError::BadGateway("Generation service failed".to_string())
            }
        }
    }
}

/// Exchange one turn of roleplay dialogue within a mission.
#[utoipa::path(
    post,
    path = "/missions/{id}/conversation",
    request_body = ConversePayload,
    responses(
        (status = 200, description = "Assistant reply for this turn", body = ConverseResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "Mission, profile, or session not found", body = ErrorResponse),
        (status = 502, description = "Generation service failed", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Mission ID"),
        ("x-user-id" = String, Header, description = "The ID of the learner")
    )
)]
pub async fn converse_mission(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConversePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("x-user-id header is required".to_string()))?;

    let mission = state
        .missions
        .get_mission(&id.to_string())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Mission with id '{}' not found", id)))?;

    let learner = state
        .learners
        .get_profile(user_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Learner profile for user '{}' not found", user_id))
        })?;

    let outcome = state
        .runtime
        .take_turn(
            &mission,
            &learner,
            user_id,
            &payload.message,
            payload.session_id.as_deref(),
        )
        .await
        .map_err(ApiError::from_conversation)?;

    Ok((
        StatusCode::OK,
        Json(ConverseResponse {
            session_id: outcome.session_id,
            reply: outcome.assistant_message,
        }),
    ))
}

/// Evaluate a finished mission conversation.
#[utoipa::path(
    post,
    path = "/missions/{id}/evaluation",
    request_body = EvaluatePayload,
    responses(
        (status = 200, description = "Validated evaluation report", body = EvaluationResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Session belongs to another user or mission", body = ErrorResponse),
        (status = 404, description = "Mission, profile, or session not found", body = ErrorResponse),
        (status = 502, description = "Evaluation service failed", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Mission ID"),
        ("x-user-id" = String, Header, description = "The ID of the learner")
    )
)]
pub async fn evaluate_mission(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(payload): Json<EvaluatePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("x-user-id header is required".to_string()))?;

    let mission = state
        .missions
        .get_mission(&id.to_string())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Mission with id '{}' not found", id)))?;

    let learner = state
        .learners
        .get_profile(user_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Learner profile for user '{}' not found", user_id))
        })?;

    let report = state
        .runtime
        .evaluate(&mission, &learner, user_id, &payload.session_id)
        .await
        .map_err(ApiError::from_conversation)?;

    Ok((StatusCode::OK, Json(EvaluationResponse::from(report))))
}

/// Report the live-session count of the in-memory store.
#[utoipa::path(
    get,
    path = "/diagnostics/sessions",
    responses(
        (status = 200, description = "Session cache statistics", body = SessionDiagnostics)
    )
)]
pub async fn session_diagnostics(
    State(state): State<Arc<AppState>>,
) -> Json<SessionDiagnostics> {
    Json(SessionDiagnostics {
        live_sessions: state.sessions.len(),
        capacity: state.sessions.capacity(),
    })
}
