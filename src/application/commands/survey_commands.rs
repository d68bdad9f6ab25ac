//! Survey Commands - 问卷管理命令

use crate::domain::survey::{SelectionMode, SurveyId};

/// 图片输入
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageInput {
    /// 无图片
    #[default]
    None,
    /// 保留已有图片（仅当它原本属于该问卷时生效）
    Keep(String),
    /// 新上传的原始图片数据（已 base64 解码）
    Upload(Vec<u8>),
}

/// 选项草稿
#[derive(Debug, Clone, Default)]
pub struct ItemDraft {
    /// 为空时按位置生成（"1", "2", ...）
    pub id: Option<String>,
    pub text_en: String,
    pub text_sv: String,
    pub image: ImageInput,
}

/// 问题草稿
#[derive(Debug, Clone, Default)]
pub struct QuestionDraft {
    /// 为空时按位置生成（"q1", "q2", ...）
    pub id: Option<String>,
    pub text_en: String,
    pub text_sv: String,
    pub selection_mode: SelectionMode,
    pub items: Vec<ItemDraft>,
}

/// 问卷草稿（创建 / 更新共用）
#[derive(Debug, Clone, Default)]
pub struct SurveyDraft {
    pub title_en: String,
    pub title_sv: String,
    pub description_en: String,
    pub description_sv: String,
    pub start_button_text_en: Option<String>,
    pub start_button_text_sv: Option<String>,
    pub hero_image: ImageInput,
    pub questions: Vec<QuestionDraft>,
}

/// 创建问卷命令
#[derive(Debug, Clone)]
pub struct CreateSurvey {
    pub draft: SurveyDraft,
}

/// 更新问卷命令
#[derive(Debug, Clone)]
pub struct UpdateSurvey {
    pub survey_id: SurveyId,
    pub draft: SurveyDraft,
}

/// 删除问卷命令
#[derive(Debug, Clone)]
pub struct DeleteSurvey {
    pub survey_id: SurveyId,
}

/// 复制问卷命令
#[derive(Debug, Clone)]
pub struct DuplicateSurvey {
    pub survey_id: SurveyId,
    pub new_title_en: Option<String>,
    pub new_title_sv: Option<String>,
}

/// 重置问卷命令（清空答卷）
#[derive(Debug, Clone)]
pub struct ResetSurvey {
    pub survey_id: SurveyId,
}
