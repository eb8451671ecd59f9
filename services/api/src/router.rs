//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST API and OpenAPI documentation.

use crate::{
    handlers,
    models::{
        ConversePayload, ConverseResponse, ErrorResponse, EvaluatePayload, EvaluationResponse,
        ObjectiveProgressDto, SessionDiagnostics,
    },
    state::AppState,
};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::converse_mission,
        handlers::evaluate_mission,
        handlers::session_diagnostics,
    ),
    components(
        schemas(
            ConversePayload,
            ConverseResponse,
            EvaluatePayload,
            EvaluationResponse,
            ObjectiveProgressDto,
            SessionDiagnostics,
            ErrorResponse
        )
    ),
    tags(
        (name = "Lingua API", description = "Roleplay mission conversations and evaluation")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Group all routes that require AppState into their own router.
    let api_router = Router::new()
        .route(
            "/missions/{id}/conversation",
            post(handlers::converse_mission),
        )
        .route("/missions/{id}/evaluation", post(handlers::evaluate_mission))
        .route("/diagnostics/sessions", get(handlers::session_diagnostics))
        .with_state(app_state);

    // Merge the stateful routes with the stateless documentation routes.
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}
