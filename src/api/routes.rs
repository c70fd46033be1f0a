use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::engine::{self, EngineError};
use crate::ingest::DatasetSnapshot;
use crate::models::Channel;
use crate::pricing::{CarFeatures, PriceModel};

/// Shared application state
///
/// The snapshot is immutable after startup; every handler reads from the same
/// pair table without locking.
#[derive(Clone)]
pub struct AppState {
    pub snapshot: Arc<DatasetSnapshot>,
    pub pricer: Arc<PriceModel>,
}

/// Create the API router
pub fn create_router(snapshot: Arc<DatasetSnapshot>, pricer: Arc<PriceModel>) -> Router {
    let state = AppState { snapshot, pricer };

    Router::new()
        .route("/health", get(health_check))
        .route("/api/stats", get(get_stats))
        .route("/api/cancellation-curve", get(get_cancellation_curve))
        .route("/api/delay-split", get(get_delay_split))
        .route("/api/threshold-impact", get(get_threshold_impact))
        .route("/predict", post(post_predict))
        .with_state(state)
}

// ===== Route Handlers =====

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Headline statistics over the loaded snapshot
async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let summary = engine::summarize(state.snapshot.records(), state.snapshot.pairs());

    Json(StatsResponse {
        summary,
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Cancellation rate as a function of the predecessor's checkout delay
async fn get_cancellation_curve(
    State(state): State<AppState>,
    Query(params): Query<CurveQuery>,
) -> Result<Json<CurveResponse>, ApiError> {
    let n_interval = params.n_interval.unwrap_or(7);
    let table = engine::aggregate(state.snapshot.pairs(), n_interval)?;

    let mut points: Vec<CurvePoint> = table
        .into_iter()
        .map(|((bucket, channel), rate)| CurvePoint {
            delay_upper_edge: bucket.upper_edge_minutes(n_interval),
            channel,
            cancellation_rate: rate.cancellation_rate,
            sample_count: rate.sample_count,
        })
        .collect();

    // Overflow (no finite edge) sorts last; ties break on channel for a
    // stable payload.
    points.sort_by(|a, b| {
        let edge_a = a.delay_upper_edge.unwrap_or(f64::INFINITY);
        let edge_b = b.delay_upper_edge.unwrap_or(f64::INFINITY);
        edge_a
            .partial_cmp(&edge_b)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.channel.as_str().cmp(b.channel.as_str()))
    });

    Ok(Json(CurveResponse {
        n_interval,
        count: points.len(),
        points,
    }))
}

/// Composition of the affected set on either side of a delay split point
async fn get_delay_split(
    State(state): State<AppState>,
    Query(params): Query<DelaySplitQuery>,
) -> Result<Json<engine::DelaySplitBreakdown>, ApiError> {
    let split_at = params.split_at.unwrap_or(360.0);
    let breakdown = engine::delay_split(state.snapshot.pairs(), split_at)?;
    Ok(Json(breakdown))
}

/// Counterfactual impact of enforcing a minimum buffer threshold
async fn get_threshold_impact(
    State(state): State<AppState>,
    Query(params): Query<ThresholdQuery>,
) -> Result<Json<ThresholdImpactResponse>, ApiError> {
    let scope = parse_scope(params.scope.as_deref())?;
    let counts = engine::simulate(state.snapshot.pairs(), params.threshold, scope)?;

    let total_rentals = state.snapshot.total_rentals();
    let canceled_affected = state.snapshot.canceled_affected();
    let revenue_loss_pct = counts.revenue_loss_pct(total_rentals)?;
    let friction_loss_pct = counts.friction_loss_pct(canceled_affected)?;

    Ok(Json(ThresholdImpactResponse {
        threshold: params.threshold,
        scope: scope.map(|c| c.as_str().to_string()),
        would_drop_completed: counts.would_drop_completed,
        would_drop_canceled: counts.would_drop_canceled,
        total_rentals,
        canceled_affected,
        revenue_loss_pct,
        friction_loss_pct,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

/// Price a batch of vehicles with the pre-fitted model
async fn post_predict(
    State(state): State<AppState>,
    Json(cars): Json<Vec<CarFeatures>>,
) -> Result<Json<PredictionResponse>, ApiError> {
    if cars.is_empty() {
        return Err(ApiError::BadRequest(
            "request must contain at least one vehicle".to_string(),
        ));
    }

    Ok(Json(PredictionResponse {
        prediction: state.pricer.predict_batch(&cars),
    }))
}

fn parse_scope(scope: Option<&str>) -> Result<Option<Channel>, ApiError> {
    match scope {
        None | Some("all") => Ok(None),
        Some("connect") => Ok(Some(Channel::Connect)),
        Some("mobile") => Ok(Some(Channel::Mobile)),
        Some(other) => Err(ApiError::BadRequest(format!(
            "unknown scope '{other}' (expected all, connect or mobile)"
        ))),
    }
}

// ===== Request/Response Types =====

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Serialize)]
struct StatsResponse {
    #[serde(flatten)]
    summary: engine::DatasetSummary,
    timestamp: String,
}

#[derive(Debug, Deserialize)]
struct CurveQuery {
    n_interval: Option<u32>,
}

#[derive(Debug, Serialize)]
struct CurvePoint {
    /// Finite upper bucket edge in minutes, `null` for the overflow bucket.
    delay_upper_edge: Option<f64>,
    channel: Channel,
    cancellation_rate: f64,
    sample_count: usize,
}

#[derive(Serialize)]
struct CurveResponse {
    n_interval: u32,
    count: usize,
    points: Vec<CurvePoint>,
}

#[derive(Debug, Deserialize)]
struct DelaySplitQuery {
    split_at: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ThresholdQuery {
    threshold: f64,
    scope: Option<String>,
}

#[derive(Serialize)]
struct ThresholdImpactResponse {
    threshold: f64,
    scope: Option<String>,
    would_drop_completed: usize,
    would_drop_canceled: usize,
    total_rentals: usize,
    canceled_affected: usize,
    revenue_loss_pct: f64,
    friction_loss_pct: f64,
    timestamp: String,
}

#[derive(Serialize)]
struct PredictionResponse {
    prediction: Vec<f64>,
}

// ===== Error Handling =====

#[derive(Debug)]
enum ApiError {
    Engine(EngineError),
    BadRequest(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError::Engine(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Engine(err @ EngineError::BrokenReference(_)) => {
                // Corrupt upstream data, not a client mistake
                tracing::error!("Engine error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Engine(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
