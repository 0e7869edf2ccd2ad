use crate::api::types::{RecommendationRequest, RecommendationResponse, RecommendedAssessment};
use crate::config::Config;
use crate::error::{RecommenderError, Result};
use crate::recommend::Recommender;
use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// HTTP front end for the recommender
pub struct HttpServer {
    state: AppState,
    allowed_origins: Vec<String>,
}

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    recommender: Arc<Recommender>,
    default_top_n: usize,
    max_top_n: usize,
}

impl HttpServer {
    pub fn new(recommender: Arc<Recommender>, config: &Config) -> Self {
        Self {
            state: AppState {
                recommender,
                default_top_n: config.search.default_top_n,
                max_top_n: config.search.max_top_n,
            },
            allowed_origins: config.http_server.allowed_origins.clone(),
        }
    }

    /// Bind and serve until the process is stopped
    pub async fn run(&self, port: u16) -> Result<()> {
        let app = self.router();

        let addr = format!("0.0.0.0:{}", port);
        log::info!("Starting HTTP server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
            RecommenderError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to bind to {}: {}. Set http_server.port in config.toml to use another port.",
                    addr, e
                ),
            ))
        })?;

        axum::serve(listener, app).await.map_err(|e| {
            RecommenderError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("HTTP server error: {}", e),
            ))
        })?;

        Ok(())
    }

    /// Build the axum router
    pub fn router(&self) -> Router {
        // Empty allowed_origins means any origin (local dev, Streamlit on another port)
        let cors = if self.allowed_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<HeaderValue> = self
                .allowed_origins
                .iter()
                .filter_map(|o| o.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .route("/", get(handle_root))
            .route("/health", get(handle_health))
            .route("/assessments", get(handle_assessments))
            .route("/job-levels", get(handle_job_levels))
            .route("/test-types", get(handle_test_types))
            .route("/languages", get(handle_languages))
            .route("/recommend", post(handle_recommend))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(cors),
            )
            .with_state(self.state.clone())
    }
}

fn error_response(status: StatusCode, error: &str, details: String) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": error,
            "details": details
        })),
    )
        .into_response()
}

async fn handle_root() -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "Welcome to SHL Assessment Recommender API",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            "status": "running"
        })),
    )
        .into_response()
}

async fn handle_health(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "service": "shl-recommender",
            "version": env!("CARGO_PKG_VERSION"),
            "assessments": state.recommender.catalog().len()
        })),
    )
        .into_response()
}

async fn handle_assessments(State(state): State<AppState>) -> Response {
    let catalog = state.recommender.catalog();
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "assessments": catalog.all(),
            "total": catalog.len()
        })),
    )
        .into_response()
}

async fn handle_job_levels(State(state): State<AppState>) -> Response {
    Json(serde_json::json!({ "job_levels": state.recommender.catalog().job_levels() }))
        .into_response()
}

async fn handle_test_types(State(state): State<AppState>) -> Response {
    Json(serde_json::json!({ "test_types": state.recommender.catalog().test_types() }))
        .into_response()
}

async fn handle_languages(State(state): State<AppState>) -> Response {
    Json(serde_json::json!({ "languages": state.recommender.catalog().languages() }))
        .into_response()
}

async fn handle_recommend(State(state): State<AppState>, body: axum::body::Bytes) -> Response {
    let request: RecommendationRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, "Invalid request", e.to_string());
        }
    };

    if request.query.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Invalid request",
            "query must not be empty".to_string(),
        );
    }

    let top_n = match request.top_n {
        None => state.default_top_n,
        Some(n) if n <= 0 => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Invalid parameter",
                format!("top_n must be a positive integer, got {}", n),
            );
        }
        Some(n) => usize::try_from(n)
            .unwrap_or(usize::MAX)
            .min(state.max_top_n),
    };

    let filters = match request.filters.normalized() {
        Ok(filters) => filters,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, "Invalid parameter", e.to_string());
        }
    };

    match state.recommender.rank(&request.query, &filters, top_n) {
        Ok(results) => {
            log::info!(
                "Recommendation request returned {} of top_n={} results",
                results.len(),
                top_n
            );
            let response = RecommendationResponse {
                query: request.query.clone(),
                filters_applied: filters,
                recommended_assessments: results.iter().map(RecommendedAssessment::from).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(RecommenderError::InvalidParameter(msg)) => {
            error_response(StatusCode::BAD_REQUEST, "Invalid parameter", msg)
        }
        Err(e) => {
            log::error!("Recommendation error: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Recommendation error",
                e.to_string(),
            )
        }
    }
}
