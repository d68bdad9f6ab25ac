//! Kiosk Config Handler

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::infrastructure::http::dto::KioskConfigResponse;
use crate::infrastructure::http::state::AppState;

/// 前端运行参数（应用名、倒计时、无操作超时）
pub async fn kiosk_config(State(state): State<Arc<AppState>>) -> Json<KioskConfigResponse> {
    Json(KioskConfigResponse {
        app_name: state.kiosk.app_name.clone(),
        thank_you_countdown: state.kiosk.thank_you_countdown,
        inactivity_timeout: state.kiosk.inactivity_timeout,
    })
}
