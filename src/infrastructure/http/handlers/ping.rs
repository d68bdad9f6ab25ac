//! Health Handler

use axum::Json;
use chrono::Utc;

use crate::domain::timestamp;
use crate::infrastructure::http::dto::HealthResponse;

/// 健康检查
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: timestamp::format(&Utc::now()),
        version: env!("CARGO_PKG_VERSION"),
    })
}
