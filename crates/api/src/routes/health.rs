//! Liveness endpoint, mounted at the root rather than under `/api/v1`.

use std::time::Instant;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database does not answer.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Round trip of the database probe, in milliseconds.
    pub db_latency_ms: u128,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let started = Instant::now();
    let probe = bimbingan_db::health_check(&state.pool).await;
    let db_latency_ms = started.elapsed().as_millis();

    if let Err(e) = &probe {
        tracing::warn!(error = %e, "Database probe failed");
    }

    Json(HealthResponse {
        status: if probe.is_ok() { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy: probe.is_ok(),
        db_latency_ms,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
