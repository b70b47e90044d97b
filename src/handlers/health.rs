//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::features::layout::LayoutInfo;
use crate::model::EngineStatus;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    model: EngineStatus,
    features: LayoutInfo,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        model: state.classifier.status(),
        features: LayoutInfo::current(),
    })
}
