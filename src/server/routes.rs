//! Router and request handlers

use axum::{
    extract::State,
    http::HeaderName,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::state::AppState;
use crate::schema::{CodeSubmission, DocRequest, GenerationRequest, ImpactRequest, Outcome};

/// Response header naming which pipeline stage produced the body
pub const PROVENANCE_HEADER: HeaderName = HeaderName::from_static("x-devmentor-provenance");

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/analyze", post(analyze))
        .route("/ghost-write", post(ghost_write))
        .route("/generate-docs", post(generate_docs))
        .route("/impact-analysis", post(impact_analysis));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers([PROVENANCE_HEADER]),
        )
        .with_state(state)
}

fn respond<T: Serialize>(outcome: Outcome<T>) -> impl IntoResponse {
    (
        [(PROVENANCE_HEADER, outcome.provenance.as_str())],
        Json(outcome.result),
    )
}

async fn root() -> &'static str {
    "DevMentor engine is running"
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub completion_configured: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: state.version,
        completion_configured: state.engine.is_configured(),
    })
}

async fn analyze(
    State(state): State<AppState>,
    Json(submission): Json<CodeSubmission>,
) -> impl IntoResponse {
    respond(state.engine.review(&submission).await)
}

async fn ghost_write(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> impl IntoResponse {
    respond(state.engine.generate(&request).await)
}

async fn generate_docs(
    State(state): State<AppState>,
    Json(request): Json<DocRequest>,
) -> impl IntoResponse {
    respond(state.engine.document(&request).await)
}

async fn impact_analysis(
    State(state): State<AppState>,
    Json(request): Json<ImpactRequest>,
) -> impl IntoResponse {
    respond(state.engine.assess_impact(&request).await)
}
