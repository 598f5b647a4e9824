//! HTTP routes of the dashboard server.

use super::page::{DashboardView, LatestSignal, render_dashboard};
use super::state::AppState;
use crate::domain::market::IndicatorRow;
use crate::domain::market::ticker::is_valid_name;
use crate::domain::ml::feature_registry::FeatureVector;
use crate::domain::signal::Signal;
use crate::infrastructure::persistence::indicator_json::{decode_rows, to_records};
use crate::infrastructure::persistence::timestamp::format_timestamp;
use axum::{
    Json, Router,
    extract::{Path, Query, Request, State, rejection::JsonRejection},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Instant;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, error, warn};

/// Errors surfaced to HTTP clients as `{"error": ...}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn validate_symbol(symbol: &str) -> Result<(), ApiError> {
    if is_valid_name(symbol) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!("invalid symbol '{}'", symbol)))
    }
}

/// Directory scans run off the async workers.
async fn list_symbols(state: &AppState) -> Result<Vec<String>, ApiError> {
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || store.list())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(|e| ApiError::Internal(e.to_string()))
}

async fn load_rows(state: &AppState, symbol: &str) -> Result<Vec<IndicatorRow>, ApiError> {
    validate_symbol(symbol)?;
    let path = state.store.path_for(symbol);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound(format!("no indicator data for {}", symbol)));
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to read indicator file");
            return Err(ApiError::Internal("failed to read indicator data".to_string()));
        }
    };
    decode_rows(&bytes, &path.display().to_string()).map_err(|e| {
        error!(error = %e, "Failed to decode indicator file");
        ApiError::Internal("malformed indicator data".to_string())
    })
}

/// Classifier prediction for the newest row with a complete feature vector
/// when a model is loaded, otherwise the last row's rule signal.
fn latest_signal(state: &AppState, rows: &[IndicatorRow]) -> Option<LatestSignal> {
    if let Some(classifier) = &state.classifier {
        // chikou is undefined on the newest `displacement` rows
        let complete = rows
            .iter()
            .rev()
            .find_map(|row| FeatureVector::from_row(row).map(|features| (row, features)));

        if let Some((row, features)) = complete {
            match classifier.predict(&features) {
                Ok(signal) => {
                    state.metrics.inc_signals("model", signal.as_str());
                    return Some(LatestSignal {
                        signal,
                        source: "model",
                        timestamp: format_timestamp(&row.timestamp),
                    });
                }
                Err(e) => warn!(error = %e, "Classifier failed, falling back to rule signal"),
            }
        }
    }

    let last = rows.last()?;
    let signal = last.signal?;
    state.metrics.inc_signals("rule", signal.as_str());
    Some(LatestSignal {
        signal,
        source: "rule",
        timestamp: format_timestamp(&last.timestamp),
    })
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    symbol: Option<String>,
}

async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Response, ApiError> {
    let symbols = list_symbols(&state).await.unwrap_or_else(|e| {
        warn!(error = ?e, "Failed to list indicator files");
        Vec::new()
    });

    let symbol = query
        .symbol
        .filter(|s| !s.trim().is_empty())
        .or_else(|| {
            let default = &state.config.server.default_symbol;
            if symbols.contains(default) || symbols.is_empty() {
                Some(default.clone())
            } else {
                symbols.first().cloned()
            }
        })
        .unwrap_or_default();

    let (status, rows, notice) = match load_rows(&state, &symbol).await {
        Ok(rows) => (StatusCode::OK, rows, None),
        Err(ApiError::NotFound(m)) => (StatusCode::NOT_FOUND, Vec::new(), Some(m)),
        Err(other) => return Err(other),
    };

    let series_json = serde_json::to_string(&to_records(&rows, state.config.indicators.signal_labels))
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let view = DashboardView {
        latest: latest_signal(&state, &rows),
        symbol,
        symbols,
        series_json,
        notice,
    };
    Ok((status, Html(render_dashboard(&view))).into_response())
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    pub signal: String,
    pub color: String,
}

impl PredictResponse {
    fn unknown() -> Self {
        Self {
            signal: "unknown".to_string(),
            color: Signal::Neutral.color().to_string(),
        }
    }

    fn from_signal(signal: Signal) -> Self {
        Self {
            signal: signal.as_str().to_string(),
            color: signal.color().to_string(),
        }
    }
}

async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<FeatureVector>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(features) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let Some(classifier) = &state.classifier else {
        state.metrics.inc_signals("none", "unknown");
        return Ok(Json(PredictResponse::unknown()));
    };

    if !features.is_finite() {
        return Err(ApiError::BadRequest("features must be finite numbers".to_string()));
    }

    let signal = classifier.predict(&features).map_err(|e| {
        error!(error = %e, "Prediction failed");
        ApiError::Internal("prediction failed".to_string())
    })?;
    state.metrics.inc_signals("model", signal.as_str());
    Ok(Json(PredictResponse::from_signal(signal)))
}

async fn symbol_signal(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let rows = load_rows(&state, &symbol).await?;
    let last = rows
        .last()
        .ok_or_else(|| ApiError::NotFound(format!("no rows for {}", symbol)))?;
    let latest = latest_signal(&state, &rows);

    Ok(Json(json!({
        "symbol": symbol,
        "timestamp": format_timestamp(&last.timestamp),
        "close": last.close,
        "signal": latest.as_ref().map(|l| l.signal.as_str()).unwrap_or("unknown"),
        "color": latest.as_ref().map(|l| l.signal.color()).unwrap_or("yellow"),
        "source": latest.as_ref().map(|l| l.source),
        "as_of": latest.as_ref().map(|l| l.timestamp.clone()),
    })))
}

async fn symbols(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    list_symbols(&state).await.map(Json)
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "kumo",
        "uptime_seconds": state.start_time.elapsed().as_secs(),
        "model_loaded": state.classifier.is_some(),
    }))
}

pub async fn metrics_handler(State(state): State<AppState>) -> String {
    state
        .metrics
        .uptime_seconds
        .set(state.start_time.elapsed().as_secs_f64());
    state.metrics.render()
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    state.metrics.http_requests_in_flight.dec();

    let duration = start.elapsed();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if response.status().is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %response.status(),
            duration_ms = duration.as_millis() as u64,
            "HTTP request error"
        );
    }
    response
}

pub fn create_router(state: AppState) -> Router {
    let data_dir = state.config.data_dir.clone();

    Router::new()
        .route("/", get(dashboard))
        .route("/predict", post(predict))
        .route("/api/symbols", get(symbols))
        .route("/api/signal/{symbol}", get(symbol_signal))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .nest_service("/data", ServeDir::new(data_dir))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            metrics_middleware,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
