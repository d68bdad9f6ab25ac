//! Survey Query Handlers

use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::bundle::{encode_image_data, BundledSurvey, SurveyBundle, BUNDLE_VERSION};
use crate::application::error::ApplicationError;
use crate::application::ports::{ImageStoragePort, ResponseRepositoryPort, SurveyRepositoryPort};
use crate::application::queries::{ExportSurveys, GetSurvey, GetSurveyResults, ListSurveys};
use crate::domain::survey::Survey;
use crate::domain::{compute_results, SurveyStats};

// ============================================================================
// Response DTOs
// ============================================================================

/// 问卷结果响应
#[derive(Debug, Clone, Serialize)]
pub struct SurveyResults {
    pub survey: Survey,
    pub stats: SurveyStats,
}

// ============================================================================
// Handlers
// ============================================================================

/// ListSurveys Handler
pub struct ListSurveysHandler {
    survey_repo: Arc<dyn SurveyRepositoryPort>,
}

impl ListSurveysHandler {
    pub fn new(survey_repo: Arc<dyn SurveyRepositoryPort>) -> Self {
        Self { survey_repo }
    }

    pub async fn handle(&self, _query: ListSurveys) -> Result<Vec<Survey>, ApplicationError> {
        Ok(self.survey_repo.find_all().await?)
    }
}

/// GetSurvey Handler
pub struct GetSurveyHandler {
    survey_repo: Arc<dyn SurveyRepositoryPort>,
}

impl GetSurveyHandler {
    pub fn new(survey_repo: Arc<dyn SurveyRepositoryPort>) -> Self {
        Self { survey_repo }
    }

    pub async fn handle(&self, query: GetSurvey) -> Result<Survey, ApplicationError> {
        self.survey_repo
            .find_by_id(&query.survey_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Survey", &query.survey_id))
    }
}

/// GetSurveyResults Handler
pub struct GetSurveyResultsHandler {
    survey_repo: Arc<dyn SurveyRepositoryPort>,
    response_repo: Arc<dyn ResponseRepositoryPort>,
}

impl GetSurveyResultsHandler {
    pub fn new(
        survey_repo: Arc<dyn SurveyRepositoryPort>,
        response_repo: Arc<dyn ResponseRepositoryPort>,
    ) -> Self {
        Self {
            survey_repo,
            response_repo,
        }
    }

    pub async fn handle(&self, query: GetSurveyResults) -> Result<SurveyResults, ApplicationError> {
        let survey = self
            .survey_repo
            .find_by_id(&query.survey_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Survey", &query.survey_id))?;

        let responses = self.response_repo.find_by_survey(&survey.id).await?;
        let stats = compute_results(&survey, &responses);

        tracing::debug!(
            survey_id = %survey.id,
            total_responses = stats.total_responses,
            "Survey results computed"
        );

        Ok(SurveyResults { survey, stats })
    }
}

/// ExportSurveys Handler - 打包全部问卷与其引用的图片
pub struct ExportSurveysHandler {
    survey_repo: Arc<dyn SurveyRepositoryPort>,
    image_storage: Arc<dyn ImageStoragePort>,
}

impl ExportSurveysHandler {
    pub fn new(
        survey_repo: Arc<dyn SurveyRepositoryPort>,
        image_storage: Arc<dyn ImageStoragePort>,
    ) -> Self {
        Self {
            survey_repo,
            image_storage,
        }
    }

    pub async fn handle(&self, _query: ExportSurveys) -> Result<SurveyBundle, ApplicationError> {
        let surveys = self.survey_repo.find_all().await?;
        let mut entries = Vec::with_capacity(surveys.len());
        let mut image_count = 0;

        for survey in surveys {
            let mut images = BTreeMap::new();
            for name in survey.image_names() {
                match self.image_storage.read(&name).await {
                    Ok(Some(data)) => {
                        images.insert(name, encode_image_data(&data));
                        image_count += 1;
                    }
                    // 缺失的图片跳过，导入时会解除引用
                    Ok(None) => {
                        tracing::warn!(survey_id = %survey.id, image = %name, "Image missing on export");
                    }
                    Err(e) => {
                        tracing::warn!(survey_id = %survey.id, image = %name, error = %e, "Image unreadable on export");
                    }
                }
            }
            entries.push(BundledSurvey { survey, images });
        }

        tracing::info!(surveys = entries.len(), images = image_count, "Surveys exported");

        Ok(SurveyBundle {
            version: BUNDLE_VERSION,
            exported_at: Utc::now(),
            surveys: entries,
        })
    }
}
