//! Transfer Command Handlers - 导入问卷包

use std::sync::Arc;

use crate::application::bundle::{decode_image_data, BUNDLE_VERSION};
use crate::application::commands::ImportSurveys;
use crate::application::error::ApplicationError;
use crate::application::ports::{ImageProcessorPort, ImageStoragePort, SurveyRepositoryPort};
use crate::domain::survey::{image_name, SurveyId};

/// 导入结果
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub survey_ids: Vec<SurveyId>,
    pub images: usize,
}

/// ImportSurveys Handler
///
/// 每个问卷分配新 ID，图片按新 ID 重新命名后写入；
/// 缺失或无法识别的图片会被丢弃，问卷本身仍然导入。
pub struct ImportSurveysHandler {
    survey_repo: Arc<dyn SurveyRepositoryPort>,
    image_storage: Arc<dyn ImageStoragePort>,
    image_processor: Arc<dyn ImageProcessorPort>,
}

impl ImportSurveysHandler {
    pub fn new(
        survey_repo: Arc<dyn SurveyRepositoryPort>,
        image_storage: Arc<dyn ImageStoragePort>,
        image_processor: Arc<dyn ImageProcessorPort>,
    ) -> Self {
        Self {
            survey_repo,
            image_storage,
            image_processor,
        }
    }

    pub async fn handle(&self, command: ImportSurveys) -> Result<ImportResult, ApplicationError> {
        let bundle = command.bundle;
        if bundle.version != BUNDLE_VERSION {
            return Err(ApplicationError::validation(format!(
                "Unsupported bundle version: {}",
                bundle.version
            )));
        }
        if bundle.surveys.is_empty() {
            return Err(ApplicationError::validation("Bundle contains no surveys"));
        }

        // 先整体校验，避免导入一半
        for entry in &bundle.surveys {
            entry.survey.validate().map_err(|e| {
                ApplicationError::validation(format!("Survey {}: {}", entry.survey.id, e))
            })?;
        }

        let mut result = ImportResult {
            survey_ids: Vec::with_capacity(bundle.surveys.len()),
            images: 0,
        };

        for entry in bundle.surveys {
            let new_id = self.survey_repo.next_id().await?;
            let (mut survey, copies) = entry.survey.rekey(new_id.clone());

            for copy in copies {
                match self.decode(entry.images.get(&copy.from).map(String::as_str)) {
                    Some((data, ext)) => {
                        // 扩展名以实际内容为准
                        let name = match image_name::extension(&copy.to) {
                            Some(current) if current == ext => copy.to.clone(),
                            _ => replace_extension(&copy.to, ext),
                        };
                        self.image_storage.save(&name, &data).await?;
                        if name != copy.to {
                            survey.rename_image(&copy.to, &name);
                        }
                        result.images += 1;
                    }
                    None => {
                        tracing::warn!(
                            survey_id = %new_id,
                            image = %copy.from,
                            "Dropping missing or unreadable image from import"
                        );
                        survey.detach_image(&copy.to);
                    }
                }
            }

            self.survey_repo.save(&survey).await?;
            result.survey_ids.push(new_id);
        }

        tracing::info!(
            surveys = result.survey_ids.len(),
            images = result.images,
            "Surveys imported"
        );

        Ok(result)
    }

    fn decode(&self, raw: Option<&str>) -> Option<(Vec<u8>, &'static str)> {
        let data = decode_image_data(raw?).ok()?;
        let ext = self.image_processor.detect_extension(&data).ok()?;
        Some((data, ext))
    }
}

fn replace_extension(name: &str, ext: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, _)) => format!("{}.{}", stem, ext),
        None => format!("{}.{}", name, ext),
    }
}
