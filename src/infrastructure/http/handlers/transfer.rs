//! Export / Import Handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

use crate::application::{ExportSurveys, ImportSurveys, SurveyBundle};
use crate::infrastructure::http::dto::ImportResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 导出全部问卷（含 base64 图片）
pub async fn export_surveys(State(state): State<Arc<AppState>>) -> Result<Json<SurveyBundle>, ApiError> {
    let bundle = state.export_surveys_handler.handle(ExportSurveys).await?;
    Ok(Json(bundle))
}

/// 导入问卷包，每个问卷分配新 ID
pub async fn import_surveys(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SurveyBundle>, JsonRejection>,
) -> Result<Json<ImportResponse>, ApiError> {
    let Json(bundle) = payload?;
    let result = state
        .import_surveys_handler
        .handle(ImportSurveys { bundle })
        .await?;

    Ok(Json(ImportResponse {
        success: true,
        imported: result.survey_ids.len(),
        survey_ids: result.survey_ids,
    }))
}
