//! Response Command Handlers

use chrono::Utc;
use std::sync::Arc;

use crate::application::commands::SubmitResponse;
use crate::application::error::ApplicationError;
use crate::application::ports::{ResponseRepositoryPort, SurveyRepositoryPort};
use crate::domain::response::Response;

/// SubmitResponse Handler - 追加答卷，首次提交时记录 first_response_at
pub struct SubmitResponseHandler {
    survey_repo: Arc<dyn SurveyRepositoryPort>,
    response_repo: Arc<dyn ResponseRepositoryPort>,
}

impl SubmitResponseHandler {
    pub fn new(
        survey_repo: Arc<dyn SurveyRepositoryPort>,
        response_repo: Arc<dyn ResponseRepositoryPort>,
    ) -> Self {
        Self {
            survey_repo,
            response_repo,
        }
    }

    pub async fn handle(&self, command: SubmitResponse) -> Result<(), ApplicationError> {
        let survey = self
            .survey_repo
            .find_by_id(&command.survey_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Survey", &command.survey_id))?;

        command.answers.check_against(&survey)?;

        let now = Utc::now();
        let response = Response::new(survey.id.clone(), command.answers, now);
        self.response_repo.append(&response).await?;

        let first = self.survey_repo.mark_first_response(&survey.id, now).await?;

        tracing::info!(
            survey_id = %survey.id,
            selections = response.selection_count(),
            first_response = first,
            "Response submitted"
        );

        Ok(())
    }
}
