use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use seoblog_core::domain::post::ResultPayload;
use seoblog_core::pipeline::{Pipeline, PipelineError};

const MISSING_KEYWORD: &str = "please provide keyword";

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/generate", get(generate))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn index() -> &'static str {
    "Hello, AI Blog Generator!"
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
struct GenerateParams {
    keyword: Option<String>,
}

async fn generate(
    State(state): State<AppState>,
    Query(params): Query<GenerateParams>,
) -> Result<Json<ResultPayload>, ApiError> {
    let Some(keyword) = params.keyword.filter(|k| !k.is_empty()) else {
        return Err(ApiError::bad_request(MISSING_KEYWORD));
    };

    let payload = state.pipeline.run(&keyword).await.map_err(|err| {
        tracing::error!(%keyword, error = %err, "generate failed");
        ApiError::from(err)
    })?;

    Ok(Json(payload))
}

/// `{"error": "<message>"}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        let message = err.to_string();
        sentry_anyhow::capture_anyhow(&anyhow::Error::new(err));
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
