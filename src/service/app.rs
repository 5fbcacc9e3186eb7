//! Axum application: routing, request handling, and error mapping
//!
//! The HTTP layer is deliberately thin: it validates the typed request
//! body, hands already-parsed inputs to the prediction sweep, and
//! serializes the curve back out. CORS policy comes from explicit
//! configuration rather than any process-global state.

use crate::config::{AppConfig, CorsSettings};
use crate::error::RatingError;
use crate::metrics::MetricsCollector;
use crate::rating::{PredictionSweep, RatingEngine};
use crate::types::{PredictRequest, SweepPoint};
use crate::utils::{current_timestamp, generate_request_id};
use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{error, info, warn};

/// Shared state for the HTTP service
#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    engine: Arc<RatingEngine>,
    metrics: Arc<MetricsCollector>,
    started_at: DateTime<Utc>,
}

impl AppState {
    /// Build application state from validated configuration
    pub fn new(config: AppConfig) -> Result<Self> {
        Ok(Self {
            config: Arc::new(config),
            engine: Arc::new(RatingEngine::with_default_solver()),
            metrics: Arc::new(MetricsCollector::new()?),
            started_at: current_timestamp(),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }
}

/// Client-facing error wrapper mapping the engine taxonomy to HTTP statuses
#[derive(Debug)]
pub struct ApiError(pub RatingError);

impl From<RatingError> for ApiError {
    fn from(err: RatingError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            RatingError::MalformedInput { .. } | RatingError::UnknownTeam { .. } => {
                StatusCode::BAD_REQUEST
            }
            RatingError::Unsolvable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            RatingError::InternalInvariant { .. } => {
                error!("internal invariant violation: {}", self.0);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

/// Metrics outcome label for an error
fn outcome_label(err: &RatingError) -> &'static str {
    match err {
        RatingError::MalformedInput { .. } => "malformed_input",
        RatingError::Unsolvable { .. } => "unsolvable",
        RatingError::UnknownTeam { .. } => "unknown_team",
        RatingError::InternalInvariant { .. } => "internal_error",
    }
}

/// Build the CORS layer from the configured allow-list
fn cors_layer(settings: &CorsSettings) -> Result<CorsLayer> {
    let origins = settings
        .allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}

/// Create the Axum router with all endpoints
pub fn create_router(state: AppState) -> Result<Router> {
    let cors = cors_layer(&state.config.cors)?;

    Ok(Router::new()
        .route("/", get(root_handler))
        .route("/predict-game-lrd", post(predict_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(cors)
        .with_state(state))
}

/// Bind and serve until the shutdown future resolves
pub async fn serve(
    state: AppState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", state.config.service.http_port)
        .parse()
        .context("Invalid server address")?;

    let app = create_router(state)?;
    let listener = TcpListener::bind(addr).await?;

    info!("Rating service listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Rating service stopped");
    Ok(())
}

/// Root endpoint handler - shows service information
async fn root_handler() -> impl IntoResponse {
    let info = json!({
        "service": "lrd-rating",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/predict-game-lrd",
            "/health",
            "/metrics",
        ],
    });

    Json(info)
}

/// Health endpoint handler
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = current_timestamp() - state.started_at;
    let body = json!({
        "status": "healthy",
        "service": state.config.service.name,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": current_timestamp(),
        "uptime_seconds": uptime.num_seconds(),
    });

    Json(body)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics.gather() {
        Ok(text) => (StatusCode::OK, text).into_response(),
        Err(e) => {
            warn!("failed to gather metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics unavailable").into_response()
        }
    }
}

/// Prediction endpoint handler
async fn predict_handler(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> std::result::Result<Json<Vec<SweepPoint>>, ApiError> {
    let request_id = generate_request_id();
    let started = Instant::now();
    let team_count = request
        .games
        .iter()
        .flat_map(|g| [&g.home_team, &g.away_team])
        .collect::<std::collections::HashSet<_>>()
        .len();

    info!(
        %request_id,
        home = %request.home_team,
        away = %request.away_team,
        games = request.games.len(),
        seeded = request.seeding.is_some(),
        "prediction request"
    );

    let sweep = PredictionSweep::new(&state.engine);
    match sweep.sweep(
        &request.games,
        request.seeding.as_ref(),
        &request.home_team,
        &request.away_team,
    ) {
        Ok(curve) => {
            let elapsed = started.elapsed().as_secs_f64();
            state
                .metrics
                .record_prediction("success", elapsed, team_count);
            info!(%request_id, points = curve.len(), elapsed_seconds = elapsed, "prediction complete");
            Ok(Json(curve))
        }
        Err(err) => {
            state.metrics.record_failure(outcome_label(&err));
            if err.is_client_error() {
                info!(%request_id, "prediction rejected: {}", err);
            }
            Err(ApiError(err))
        }
    }
}
