//! API routes for the incident dashboard.

use crate::aggregate::ChartData;
use crate::model::ClassifiedRecord;
use crate::server::AppState;
use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::sync::Arc;

type AppStateArc = Arc<AppState>;

/// Payload served to the dashboard. `chart_data.labels[i]` and
/// `chart_data.values[i]` correspond positionally.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataResponse {
    pub chart_data: ChartData,
    pub table_data: Vec<ClassifiedRecord>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub rows_loaded: usize,
}

pub fn data_routes() -> Router<AppStateArc> {
    Router::new().route("/api/data", get(get_data))
}

/// Returns the processed incident data and chart data as JSON.
async fn get_data(State(state): State<AppStateArc>) -> Json<DataResponse> {
    let snapshot = state.current().await;

    Json(DataResponse {
        chart_data: snapshot.totals.clone(),
        table_data: snapshot.records.clone(),
    })
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/api/health", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    let snapshot = state.current().await;

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        rows_loaded: snapshot.records.len(),
    })
}
