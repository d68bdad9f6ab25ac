//! Admin Survey Handlers - 问卷管理

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use std::sync::Arc;

use crate::application::{
    CreateSurvey, DeleteSurvey, DuplicateSurvey, GetSurveyResults, ResetSurvey, SurveyResults,
    UpdateSurvey,
};
use crate::domain::survey::SurveyId;
use crate::infrastructure::http::dto::{
    DuplicatePayload, SuccessResponse, SurveyCreatedResponse, SurveyPayload,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 创建问卷
pub async fn create_survey(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SurveyPayload>, JsonRejection>,
) -> Result<Json<SurveyCreatedResponse>, ApiError> {
    let Json(payload) = payload?;
    let command = CreateSurvey {
        draft: payload.into_draft()?,
    };
    let survey_id = state.create_survey_handler.handle(command).await?;
    Ok(Json(SurveyCreatedResponse::new(survey_id)))
}

/// 更新问卷
pub async fn update_survey(
    State(state): State<Arc<AppState>>,
    Path(survey_id): Path<String>,
    payload: Result<Json<SurveyPayload>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let Json(payload) = payload?;
    let command = UpdateSurvey {
        survey_id: SurveyId::new(survey_id),
        draft: payload.into_draft()?,
    };
    state.update_survey_handler.handle(command).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// 删除问卷及其图片
pub async fn delete_survey(
    State(state): State<Arc<AppState>>,
    Path(survey_id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let command = DeleteSurvey {
        survey_id: SurveyId::new(survey_id),
    };
    state.delete_survey_handler.handle(command).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// 复制问卷
pub async fn duplicate_survey(
    State(state): State<Arc<AppState>>,
    Path(survey_id): Path<String>,
    payload: Option<Json<DuplicatePayload>>,
) -> Result<Json<SurveyCreatedResponse>, ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let command = DuplicateSurvey {
        survey_id: SurveyId::new(survey_id),
        new_title_en: payload.new_title_en,
        new_title_sv: payload.new_title_sv,
    };
    let new_id = state.duplicate_survey_handler.handle(command).await?;
    Ok(Json(SurveyCreatedResponse::new(new_id)))
}

/// 清空问卷答卷
pub async fn reset_survey(
    State(state): State<Arc<AppState>>,
    Path(survey_id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let command = ResetSurvey {
        survey_id: SurveyId::new(survey_id),
    };
    state.reset_survey_handler.handle(command).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// 问卷统计结果
pub async fn survey_results(
    State(state): State<Arc<AppState>>,
    Path(survey_id): Path<String>,
) -> Result<Json<SurveyResults>, ApiError> {
    let query = GetSurveyResults {
        survey_id: SurveyId::new(survey_id),
    };
    let results = state.get_survey_results_handler.handle(query).await?;
    Ok(Json(results))
}
