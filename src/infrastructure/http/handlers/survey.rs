//! Public Survey Handlers - Kiosk 端

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use std::sync::Arc;

use crate::application::{GetSurvey, ListSurveys, SubmitResponse};
use crate::domain::survey::{Survey, SurveyId};
use crate::infrastructure::http::dto::{SubmitPayload, SuccessResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 列出全部问卷
pub async fn list_surveys(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Survey>>, ApiError> {
    let surveys = state.list_surveys_handler.handle(ListSurveys).await?;
    Ok(Json(surveys))
}

/// 获取单个问卷
pub async fn get_survey(
    State(state): State<Arc<AppState>>,
    Path(survey_id): Path<String>,
) -> Result<Json<Survey>, ApiError> {
    let query = GetSurvey {
        survey_id: SurveyId::new(survey_id),
    };
    let survey = state.get_survey_handler.handle(query).await?;
    Ok(Json(survey))
}

/// 提交答卷
pub async fn submit_response(
    State(state): State<Arc<AppState>>,
    Path(survey_id): Path<String>,
    payload: Result<Json<SubmitPayload>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let Json(payload) = payload.map_err(|_| ApiError::BadRequest("Invalid data".to_string()))?;

    let command = SubmitResponse {
        survey_id: SurveyId::new(survey_id),
        answers: payload.into_answers()?,
    };
    state.submit_response_handler.handle(command).await?;

    Ok(Json(SuccessResponse::ok()))
}
