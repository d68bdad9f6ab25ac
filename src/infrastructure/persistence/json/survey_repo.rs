//! JSON Survey Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use super::store::JsonFileStore;
use crate::application::ports::{ContentReplaced, RepositoryError, SurveyRepositoryPort};
use crate::domain::survey::{Survey, SurveyContent, SurveyId};

/// 基于 `surveys.json` 的 Survey Repository
pub struct JsonSurveyRepository {
    store: JsonFileStore<Survey>,
    /// 已分配出去但可能尚未保存的最大 ID
    reserved: AtomicU64,
}

impl JsonSurveyRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonFileStore::new(path),
            reserved: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl SurveyRepositoryPort for JsonSurveyRepository {
    async fn find_all(&self) -> Result<Vec<Survey>, RepositoryError> {
        self.store.load().await
    }

    async fn find_by_id(&self, id: &SurveyId) -> Result<Option<Survey>, RepositoryError> {
        let surveys = self.store.load().await?;
        Ok(surveys.into_iter().find(|s| &s.id == id))
    }

    async fn next_id(&self) -> Result<SurveyId, RepositoryError> {
        self.store
            .update(|surveys| {
                let stored: u64 = SurveyId::next(surveys.iter().map(|s| &s.id))
                    .as_str()
                    .parse()
                    .unwrap_or(1);
                let previous = self.reserved.fetch_max(stored, Ordering::SeqCst);
                let id = if previous >= stored {
                    self.reserved.fetch_add(1, Ordering::SeqCst) + 1
                } else {
                    stored
                };
                (SurveyId::new(id.to_string()), false)
            })
            .await
    }

    async fn save(&self, survey: &Survey) -> Result<(), RepositoryError> {
        self.store
            .update(|surveys| {
                match surveys.iter_mut().find(|s| s.id == survey.id) {
                    Some(existing) => *existing = survey.clone(),
                    None => surveys.push(survey.clone()),
                }
                ((), true)
            })
            .await
    }

    async fn replace_content(
        &self,
        id: &SurveyId,
        content: SurveyContent,
    ) -> Result<Option<ContentReplaced>, RepositoryError> {
        self.store
            .update(|surveys| match surveys.iter_mut().find(|s| &s.id == id) {
                Some(survey) => {
                    let previous_images = survey.image_names();
                    survey.apply(content);
                    let replaced = ContentReplaced {
                        previous_images,
                        survey: survey.clone(),
                    };
                    (Some(replaced), true)
                }
                None => (None, false),
            })
            .await
    }

    async fn delete(&self, id: &SurveyId) -> Result<bool, RepositoryError> {
        self.store
            .update(|surveys| {
                let before = surveys.len();
                surveys.retain(|s| &s.id != id);
                let removed = surveys.len() != before;
                (removed, removed)
            })
            .await
    }

    async fn mark_first_response(
        &self,
        id: &SurveyId,
        at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        self.store
            .update(|surveys| {
                let changed = surveys
                    .iter_mut()
                    .find(|s| &s.id == id)
                    .map(|s| s.mark_first_response(at))
                    .unwrap_or(false);
                (changed, changed)
            })
            .await
    }

    async fn clear_first_response(&self, id: &SurveyId) -> Result<(), RepositoryError> {
        self.store
            .update(|surveys| match surveys.iter_mut().find(|s| &s.id == id) {
                Some(survey) if survey.first_response_at.is_some() => {
                    survey.clear_first_response();
                    ((), true)
                }
                _ => ((), false),
            })
            .await
    }
}
