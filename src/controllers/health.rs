use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::infrastructure::repositories::MeasurementRepository;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(
    State(measurements): State<Arc<dyn MeasurementRepository>>,
) -> impl IntoResponse {
    match measurements.check_connection().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "influxdb": "connected"
            })),
        ),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "influxdb": "disconnected"
            })),
        ),
    }
}
