//! Survey Command Handlers

use chrono::Utc;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::application::commands::{
    CreateSurvey, DeleteSurvey, DuplicateSurvey, ImageInput, ResetSurvey, SurveyDraft, UpdateSurvey,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ImageKind, ImageProcessorPort, ImageStoragePort, ProcessedImage, ResponseRepositoryPort,
    SurveyRepositoryPort,
};
use crate::domain::survey::{
    image_name, validate_questions, Item, Question, Survey, SurveyContent, SurveyId,
};

// ============================================================================
// 公共逻辑：草稿 → 问卷内容 + 待写入图片
// ============================================================================

/// 待写入的图片文件
struct PendingImage {
    name: String,
    data: Vec<u8>,
}

/// 图片槽位：选项（问题下标, 选项下标）或封面
enum ImageSlot {
    Item(usize, usize),
    Hero,
}

/// 在阻塞线程池中优化图片
pub(crate) async fn optimize_image(
    processor: &Arc<dyn ImageProcessorPort>,
    data: Vec<u8>,
    kind: ImageKind,
) -> Result<ProcessedImage, ApplicationError> {
    let processor = processor.clone();
    tokio::task::spawn_blocking(move || processor.optimize(&data, kind))
        .await
        .map_err(|e| ApplicationError::internal(format!("Image task failed: {}", e)))?
        .map_err(ApplicationError::from)
}

/// 把草稿转换为问卷内容
///
/// 1. 补全缺省 ID 并校验结构（此时还未写任何文件）
/// 2. 优化所有上传图片，按命名规则生成文件名
/// 3. `Keep` 引用只有在 `retained` 中（即原本属于该问卷）才保留
async fn build_content(
    survey_id: &SurveyId,
    draft: SurveyDraft,
    retained: &BTreeSet<String>,
    processor: &Arc<dyn ImageProcessorPort>,
) -> Result<(SurveyContent, Vec<PendingImage>), ApplicationError> {
    let mut uploads: Vec<(ImageSlot, Vec<u8>)> = Vec::new();
    let mut questions = Vec::with_capacity(draft.questions.len());

    for (qi, q) in draft.questions.into_iter().enumerate() {
        let question_id = non_empty(q.id).unwrap_or_else(|| format!("q{}", qi + 1));
        let mut items = Vec::with_capacity(q.items.len());

        for (ii, item) in q.items.into_iter().enumerate() {
            let item_id = non_empty(item.id).unwrap_or_else(|| (ii + 1).to_string());
            let mut entry = Item::new(item_id, item.text_en, item.text_sv);
            match item.image {
                ImageInput::None => {}
                ImageInput::Keep(name) => entry.image = keep_if_retained(name, retained),
                ImageInput::Upload(data) => uploads.push((ImageSlot::Item(qi, ii), data)),
            }
            items.push(entry);
        }

        questions.push(Question {
            id: question_id,
            text_en: q.text_en,
            text_sv: q.text_sv,
            selection_mode: q.selection_mode,
            items,
        });
    }

    validate_questions(&questions)?;

    let mut hero_image = None;
    match draft.hero_image {
        ImageInput::None => {}
        ImageInput::Keep(name) => hero_image = keep_if_retained(name, retained),
        ImageInput::Upload(data) => uploads.push((ImageSlot::Hero, data)),
    }

    // 保留的文件不能被新上传覆盖（ID 按位置补全时可能撞名）
    let mut taken: BTreeSet<String> = questions
        .iter()
        .flat_map(|q| q.items.iter().filter_map(|item| item.image.clone()))
        .chain(hero_image.clone())
        .collect();

    let mut pending = Vec::with_capacity(uploads.len());
    for (slot, data) in uploads {
        match slot {
            ImageSlot::Item(qi, ii) => {
                let processed = optimize_image(processor, data, ImageKind::Item).await?;
                let question = &mut questions[qi];
                let item = &mut question.items[ii];
                let name = claim_name(
                    image_name::item(survey_id, &question.id, &item.id, processed.extension),
                    &mut taken,
                );
                item.image = Some(name.clone());
                pending.push(PendingImage { name, data: processed.data });
            }
            ImageSlot::Hero => {
                let processed = optimize_image(processor, data, ImageKind::Hero).await?;
                let name = claim_name(image_name::hero(survey_id, processed.extension), &mut taken);
                hero_image = Some(name.clone());
                pending.push(PendingImage { name, data: processed.data });
            }
        }
    }

    let content = SurveyContent {
        title_en: draft.title_en,
        title_sv: draft.title_sv,
        description_en: draft.description_en,
        description_sv: draft.description_sv,
        start_button_text_en: non_empty(draft.start_button_text_en),
        start_button_text_sv: non_empty(draft.start_button_text_sv),
        hero_image,
        questions,
    };

    Ok((content, pending))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn keep_if_retained(name: String, retained: &BTreeSet<String>) -> Option<String> {
    if retained.contains(&name) {
        Some(name)
    } else {
        tracing::warn!(image = %name, "Ignoring reference to an image the survey does not own");
        None
    }
}

/// 取第一个未被占用的文件名并登记
fn claim_name(preferred: String, taken: &mut BTreeSet<String>) -> String {
    let mut name = preferred.clone();
    let mut n = 2;
    while taken.contains(&name) {
        name = image_name::variant(&preferred, n);
        n += 1;
    }
    taken.insert(name.clone());
    name
}

async fn write_images(
    storage: &Arc<dyn ImageStoragePort>,
    pending: Vec<PendingImage>,
) -> Result<(), ApplicationError> {
    for image in pending {
        storage.save(&image.name, &image.data).await?;
    }
    Ok(())
}

/// 尽力删除图片，失败只记录日志，返回实际删除数量
pub(crate) async fn remove_images(
    storage: &Arc<dyn ImageStoragePort>,
    names: impl IntoIterator<Item = String>,
) -> usize {
    let mut deleted = 0;
    for name in names {
        match storage.delete(&name).await {
            Ok(true) => deleted += 1,
            Ok(false) => tracing::debug!(image = %name, "Image already gone"),
            Err(e) => tracing::warn!(image = %name, error = %e, "Failed to delete image"),
        }
    }
    deleted
}

// ============================================================================
// CreateSurvey
// ============================================================================

/// CreateSurvey Handler
pub struct CreateSurveyHandler {
    survey_repo: Arc<dyn SurveyRepositoryPort>,
    image_storage: Arc<dyn ImageStoragePort>,
    image_processor: Arc<dyn ImageProcessorPort>,
}

impl CreateSurveyHandler {
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

    pub async fn handle(&self, command: CreateSurvey) -> Result<SurveyId, ApplicationError> {
        let survey_id = self.survey_repo.next_id().await?;

        let (content, pending) = build_content(
            &survey_id,
            command.draft,
            &BTreeSet::new(),
            &self.image_processor,
        )
        .await?;
        let image_count = pending.len();

        write_images(&self.image_storage, pending).await?;

        let survey = Survey::new(survey_id.clone(), content, Utc::now());
        self.survey_repo.save(&survey).await?;

        tracing::info!(
            survey_id = %survey_id,
            questions = survey.questions.len(),
            images = image_count,
            "Survey created"
        );

        Ok(survey_id)
    }
}

// ============================================================================
// UpdateSurvey
// ============================================================================

/// UpdateSurvey Handler - 前后图片集合求差，删除不再引用的文件
pub struct UpdateSurveyHandler {
    survey_repo: Arc<dyn SurveyRepositoryPort>,
    image_storage: Arc<dyn ImageStoragePort>,
    image_processor: Arc<dyn ImageProcessorPort>,
}

impl UpdateSurveyHandler {
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

    pub async fn handle(&self, command: UpdateSurvey) -> Result<(), ApplicationError> {
        let current = self
            .survey_repo
            .find_by_id(&command.survey_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Survey", &command.survey_id))?;

        let owned = current.image_names();
        let (content, pending) =
            build_content(&current.id, command.draft, &owned, &self.image_processor).await?;
        let written: Vec<String> = pending.iter().map(|image| image.name.clone()).collect();

        write_images(&self.image_storage, pending).await?;

        // 内容替换在存储锁内完成，期间的首次提交 / 重置不会被覆盖
        let Some(replaced) = self
            .survey_repo
            .replace_content(&current.id, content)
            .await?
        else {
            remove_images(&self.image_storage, written).await;
            return Err(ApplicationError::not_found("Survey", &current.id));
        };
        let survey = replaced.survey;

        let after = survey.image_names();
        let orphaned: Vec<String> = replaced
            .previous_images
            .difference(&after)
            .cloned()
            .collect();
        let deleted = remove_images(&self.image_storage, orphaned).await;

        tracing::info!(
            survey_id = %survey.id,
            deleted_images = deleted,
            "Survey updated"
        );

        Ok(())
    }
}

// ============================================================================
// DeleteSurvey
// ============================================================================

/// DeleteSurvey Handler
pub struct DeleteSurveyHandler {
    survey_repo: Arc<dyn SurveyRepositoryPort>,
    image_storage: Arc<dyn ImageStoragePort>,
}

impl DeleteSurveyHandler {
    pub fn new(
        survey_repo: Arc<dyn SurveyRepositoryPort>,
        image_storage: Arc<dyn ImageStoragePort>,
    ) -> Self {
        Self {
            survey_repo,
            image_storage,
        }
    }

    /// 返回删除的图片数量
    pub async fn handle(&self, command: DeleteSurvey) -> Result<usize, ApplicationError> {
        let survey = self
            .survey_repo
            .find_by_id(&command.survey_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Survey", &command.survey_id))?;

        let deleted = remove_images(&self.image_storage, survey.image_names()).await;
        self.survey_repo.delete(&survey.id).await?;

        tracing::info!(
            survey_id = %survey.id,
            deleted_images = deleted,
            "Survey deleted"
        );

        Ok(deleted)
    }
}

// ============================================================================
// DuplicateSurvey
// ============================================================================

/// DuplicateSurvey Handler - 深拷贝问题与选项，复制图片文件
pub struct DuplicateSurveyHandler {
    survey_repo: Arc<dyn SurveyRepositoryPort>,
    image_storage: Arc<dyn ImageStoragePort>,
}

impl DuplicateSurveyHandler {
    pub fn new(
        survey_repo: Arc<dyn SurveyRepositoryPort>,
        image_storage: Arc<dyn ImageStoragePort>,
    ) -> Self {
        Self {
            survey_repo,
            image_storage,
        }
    }

    pub async fn handle(&self, command: DuplicateSurvey) -> Result<SurveyId, ApplicationError> {
        let source = self
            .survey_repo
            .find_by_id(&command.survey_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Survey", &command.survey_id))?;

        let new_id = self.survey_repo.next_id().await?;
        let title_en = non_empty(command.new_title_en)
            .unwrap_or_else(|| format!("{} (copy)", source.title_en));
        let title_sv = non_empty(command.new_title_sv)
            .unwrap_or_else(|| format!("{} (copy)", source.title_sv));

        let (mut copy, images) = source.duplicate(new_id.clone(), title_en, title_sv, Utc::now());

        for image in &images {
            let copied = match self.image_storage.copy(&image.from, &image.to).await {
                Ok(copied) => copied,
                Err(e) => {
                    tracing::warn!(from = %image.from, error = %e, "Failed to copy image");
                    false
                }
            };
            if !copied {
                copy.detach_image(&image.to);
            }
        }

        self.survey_repo.save(&copy).await?;

        tracing::info!(
            source_id = %source.id,
            survey_id = %new_id,
            images = copy.image_names().len(),
            "Survey duplicated"
        );

        Ok(new_id)
    }
}

// ============================================================================
// ResetSurvey
// ============================================================================

/// ResetSurvey Handler - 清空答卷与 first_response_at
pub struct ResetSurveyHandler {
    survey_repo: Arc<dyn SurveyRepositoryPort>,
    response_repo: Arc<dyn ResponseRepositoryPort>,
}

impl ResetSurveyHandler {
    pub fn new(
        survey_repo: Arc<dyn SurveyRepositoryPort>,
        response_repo: Arc<dyn ResponseRepositoryPort>,
    ) -> Self {
        Self {
            survey_repo,
            response_repo,
        }
    }

    /// 返回删除的答卷数量
    pub async fn handle(&self, command: ResetSurvey) -> Result<usize, ApplicationError> {
        self.survey_repo
            .find_by_id(&command.survey_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Survey", &command.survey_id))?;

        let removed = self.response_repo.delete_by_survey(&command.survey_id).await?;
        self.survey_repo.clear_first_response(&command.survey_id).await?;

        tracing::info!(
            survey_id = %command.survey_id,
            removed_responses = removed,
            "Survey reset"
        );

        Ok(removed)
    }
}
