//! JSON Response Repository

use async_trait::async_trait;
use std::path::PathBuf;

use super::store::JsonFileStore;
use crate::application::ports::{RepositoryError, ResponseRepositoryPort};
use crate::domain::response::Response;
use crate::domain::survey::SurveyId;

/// 基于 `responses.json` 的 Response Repository（全部问卷共用一个文件）
pub struct JsonResponseRepository {
    store: JsonFileStore<Response>,
}

impl JsonResponseRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonFileStore::new(path),
        }
    }
}

#[async_trait]
impl ResponseRepositoryPort for JsonResponseRepository {
    async fn append(&self, response: &Response) -> Result<(), RepositoryError> {
        self.store
            .update(|responses| {
                responses.push(response.clone());
                ((), true)
            })
            .await
    }

    async fn find_by_survey(&self, survey_id: &SurveyId) -> Result<Vec<Response>, RepositoryError> {
        let responses = self.store.load().await?;
        Ok(responses
            .into_iter()
            .filter(|r| &r.survey_id == survey_id)
            .collect())
    }

    async fn delete_by_survey(&self, survey_id: &SurveyId) -> Result<usize, RepositoryError> {
        self.store
            .update(|responses| {
                let before = responses.len();
                responses.retain(|r| &r.survey_id != survey_id);
                let removed = before - responses.len();
                (removed, removed > 0)
            })
            .await
    }
}
