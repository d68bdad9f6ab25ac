//! Data Transfer Objects
//!
//! 请求体兼容两代前端：旧版扁平 `items` / `selected_items`，
//! 以及新版 `questions` / `responses`。

use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::application::bundle::decode_image_data;
use crate::application::{ImageInput, ItemDraft, QuestionDraft, SurveyDraft};
use crate::domain::response::{Answers, QuestionAnswer};
use crate::domain::survey::{SelectionMode, SurveyId, LEGACY_QUESTION_ID};
use crate::infrastructure::http::error::ApiError;

// ============================================================================
// 通用响应结构
// ============================================================================

/// `{"success": true}`
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// 创建 / 复制问卷响应
#[derive(Debug, Serialize)]
pub struct SurveyCreatedResponse {
    pub success: bool,
    pub survey_id: SurveyId,
}

impl SurveyCreatedResponse {
    pub fn new(survey_id: SurveyId) -> Self {
        Self {
            success: true,
            survey_id,
        }
    }
}

/// 导入响应
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    pub imported: usize,
    pub survey_ids: Vec<SurveyId>,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

// ============================================================================
// Auth DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
}

// ============================================================================
// Survey DTOs
// ============================================================================

/// 选项请求体
///
/// 图片字段：
/// - `image_data` / `imageData`：新上传的 base64
/// - `existing_image`：保留已有文件
/// - `image`：data URL 视为上传，否则视为已有文件名
#[derive(Debug, Default, Deserialize)]
pub struct ItemPayload {
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub text_en: Option<String>,
    #[serde(default)]
    pub text_sv: Option<String>,
    #[serde(default, alias = "imageData")]
    pub image_data: Option<String>,
    #[serde(default)]
    pub existing_image: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// 问题请求体
#[derive(Debug, Default, Deserialize)]
pub struct QuestionPayload {
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub text_en: Option<String>,
    #[serde(default)]
    pub text_sv: Option<String>,
    #[serde(default)]
    pub selection_mode: SelectionMode,
    #[serde(default)]
    pub items: Vec<ItemPayload>,
}

/// 创建 / 更新问卷请求体
#[derive(Debug, Default, Deserialize)]
pub struct SurveyPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_en: Option<String>,
    #[serde(default)]
    pub title_sv: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description_en: Option<String>,
    #[serde(default)]
    pub description_sv: Option<String>,
    #[serde(default)]
    pub start_button_text_en: Option<String>,
    #[serde(default)]
    pub start_button_text_sv: Option<String>,
    #[serde(default, alias = "heroImageData")]
    pub hero_image_data: Option<String>,
    #[serde(default)]
    pub existing_hero_image: Option<String>,
    #[serde(default)]
    pub hero_image: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<ItemPayload>>,
    #[serde(default)]
    pub questions: Option<Vec<QuestionPayload>>,
}

impl SurveyPayload {
    /// 转换为命令草稿，同时解码所有上传图片
    pub fn into_draft(self) -> Result<SurveyDraft, ApiError> {
        let title = self.title.unwrap_or_default();
        let description = self.description.unwrap_or_default();
        let title_en = self.title_en.unwrap_or_else(|| title.clone());
        let title_sv = self.title_sv.unwrap_or(title);

        let questions = match (self.questions, self.items) {
            (Some(questions), _) => questions
                .into_iter()
                .map(QuestionPayload::into_draft)
                .collect::<Result<Vec<_>, _>>()?,
            (None, Some(items)) => vec![QuestionDraft {
                id: Some(LEGACY_QUESTION_ID.to_string()),
                text_en: title_en.clone(),
                text_sv: title_sv.clone(),
                selection_mode: SelectionMode::Multiple,
                items: items
                    .into_iter()
                    .map(ItemPayload::into_draft)
                    .collect::<Result<Vec<_>, _>>()?,
            }],
            (None, None) => {
                return Err(ApiError::BadRequest(
                    "Survey must contain questions or items".to_string(),
                ))
            }
        };

        Ok(SurveyDraft {
            title_en,
            title_sv,
            description_en: self.description_en.unwrap_or_else(|| description.clone()),
            description_sv: self.description_sv.unwrap_or(description),
            start_button_text_en: self.start_button_text_en,
            start_button_text_sv: self.start_button_text_sv,
            hero_image: image_input(self.hero_image_data, self.existing_hero_image, self.hero_image)?,
            questions,
        })
    }
}

impl QuestionPayload {
    fn into_draft(self) -> Result<QuestionDraft, ApiError> {
        let text = self.text.unwrap_or_default();
        Ok(QuestionDraft {
            id: self.id,
            text_en: self.text_en.unwrap_or_else(|| text.clone()),
            text_sv: self.text_sv.unwrap_or(text),
            selection_mode: self.selection_mode,
            items: self
                .items
                .into_iter()
                .map(ItemPayload::into_draft)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

impl ItemPayload {
    fn into_draft(self) -> Result<ItemDraft, ApiError> {
        let text = self.text.unwrap_or_default();
        Ok(ItemDraft {
            id: self.id,
            text_en: self.text_en.unwrap_or_else(|| text.clone()),
            text_sv: self.text_sv.unwrap_or(text),
            image: image_input(self.image_data, self.existing_image, self.image)?,
        })
    }
}

/// 解析图片字段，上传优先于保留
fn image_input(
    upload: Option<String>,
    existing: Option<String>,
    image: Option<String>,
) -> Result<ImageInput, ApiError> {
    let upload = non_blank(upload);
    let image = non_blank(image);

    let (upload, image) = match (upload, image) {
        (Some(data), image) => (Some(data), image),
        (None, Some(image)) if image.starts_with("data:") => (Some(image), None),
        (None, image) => (None, image),
    };

    if let Some(data) = upload {
        let bytes = decode_image_data(&data)
            .map_err(|_| ApiError::BadRequest("Invalid image data".to_string()))?;
        return Ok(ImageInput::Upload(bytes));
    }

    Ok(match non_blank(existing).or(image) {
        Some(name) => ImageInput::Keep(name),
        None => ImageInput::None,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// 复制问卷请求体
#[derive(Debug, Default, Deserialize)]
pub struct DuplicatePayload {
    #[serde(default)]
    pub new_title_en: Option<String>,
    #[serde(default)]
    pub new_title_sv: Option<String>,
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct QuestionAnswerPayload {
    #[serde(deserialize_with = "required_id", alias = "questionId")]
    pub question_id: String,
    #[serde(default, alias = "selectedItems", deserialize_with = "id_list")]
    pub selected_items: Vec<String>,
}

/// 提交答卷请求体
#[derive(Debug, Default, Deserialize)]
pub struct SubmitPayload {
    #[serde(default, alias = "selectedItems", deserialize_with = "optional_id_list")]
    pub selected_items: Option<Vec<String>>,
    #[serde(default)]
    pub responses: Option<Vec<QuestionAnswerPayload>>,
}

impl SubmitPayload {
    pub fn into_answers(self) -> Result<Answers, ApiError> {
        match (self.responses, self.selected_items) {
            (Some(responses), _) => Ok(Answers::Questions {
                responses: responses
                    .into_iter()
                    .map(|a| QuestionAnswer {
                        question_id: a.question_id,
                        selected_items: a.selected_items,
                    })
                    .collect(),
            }),
            (None, Some(selected_items)) => Ok(Answers::Legacy { selected_items }),
            (None, None) => Err(ApiError::BadRequest("Invalid data".to_string())),
        }
    }
}

// ============================================================================
// Public DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub version: &'static str,
}

/// Kiosk 前端配置
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KioskConfigResponse {
    pub app_name: String,
    pub thank_you_countdown: u32,
    pub inactivity_timeout: u32,
}

// ============================================================================
// ID 反序列化（字符串或数字）
// ============================================================================

fn value_to_id(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(value_to_id))
}

fn required_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_to_id(value.clone())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid id: {}", value)))
}

fn id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<Value>::deserialize(deserializer)?
        .into_iter()
        .map(|v| {
            value_to_id(v.clone())
                .ok_or_else(|| serde::de::Error::custom(format!("invalid id: {}", v)))
        })
        .collect()
}

fn optional_id_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    id_list(deserializer).map(Some)
}
