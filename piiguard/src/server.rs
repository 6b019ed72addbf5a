// piiguard/src/server.rs
//! HTTP boundary for the analyzer.
//!
//! Routes:
//! * `POST /analyze` - body `{"text", "language", "entities"}`, returns the detections.
//! * `GET /recognizers` - the active recognizers.
//! * `GET /health` - liveness plus the supported languages; never needs the API key.
//!
//! When an API key is configured, `/analyze` and `/recognizers` reject requests
//! whose `x-api-key` header does not match before the engine is touched.
//! License: MIT OR APACHE 2.0

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};

use piiguard_core::config::DEFAULT_LANGUAGE;
use piiguard_core::{AnalysisRequest, AnalyzerEngine, Detection, PiiGuardError};

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// State shared by every request handler.
pub struct AppState {
    engine: AnalyzerEngine,
    api_key: Option<String>,
}

impl AppState {
    /// An empty `api_key` disables the check.
    pub fn new(engine: AnalyzerEngine, api_key: Option<String>) -> Arc<Self> {
        Arc::new(Self {
            engine,
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    pub fn engine(&self) -> &AnalyzerEngine {
        &self.engine
    }

    pub fn requires_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Body of `POST /analyze`. Every field is optional.
#[derive(Debug, Deserialize)]
pub struct AnalyzeBody {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub entities: Option<Vec<String>>,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl From<AnalyzeBody> for AnalysisRequest {
    fn from(body: AnalyzeBody) -> Self {
        AnalysisRequest::new(body.text)
            .with_language(body.language)
            .with_entities(body.entities.unwrap_or_default())
    }
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    languages: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RecognizerBody {
    name: String,
    language: String,
    entities: Vec<String>,
    kind: &'static str,
}

/// Errors returned to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing or invalid API key")]
    Unauthorized,

    #[error(transparent)]
    Analysis(#[from] PiiGuardError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Analysis(PiiGuardError::UnsupportedLanguage(_)) => StatusCode::BAD_REQUEST,
            ApiError::Analysis(PiiGuardError::AllRecognizersFailed { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Analysis(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Builds the router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/analyze", post(analyze_handler))
        .route("/recognizers", get(recognizers_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .route("/health", get(health_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Compares two keys without short-circuiting on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

async fn require_api_key(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    if let Some(expected) = &state.api_key {
        let provided = request
            .headers()
            .get(API_KEY_HEADER)
            .map(|v| v.as_bytes())
            .unwrap_or_default();
        if !constant_time_eq(provided, expected.as_bytes()) {
            warn!("Rejected {} {}: bad API key", request.method(), request.uri().path());
            return ApiError::Unauthorized.into_response();
        }
    }
    next.run(request).await
}

async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AnalyzeBody>,
) -> Result<Json<Vec<Detection>>, ApiError> {
    let request = AnalysisRequest::from(body);
    let result = state.engine.analyze(&request).await?;
    Ok(Json(result.detections))
}

async fn recognizers_handler(State(state): State<Arc<AppState>>) -> Json<Vec<RecognizerBody>> {
    let body = state
        .engine
        .registry()
        .all()
        .map(|r| RecognizerBody {
            name: r.name().to_string(),
            language: r.language().to_string(),
            entities: r.supported_entities().iter().map(ToString::to_string).collect(),
            kind: r.kind_name(),
        })
        .collect();
    Json(body)
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthBody> {
    let languages = state
        .engine
        .registry()
        .supported_languages()
        .into_iter()
        .map(str::to_string)
        .collect();
    Json(HealthBody { status: "ok", languages })
}

/// Serves `app` on `listener` until Ctrl-C.
pub async fn serve(listener: tokio::net::TcpListener, app: Router) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections.");
}
