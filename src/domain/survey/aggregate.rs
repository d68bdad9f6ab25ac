//! Survey Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use super::entities::id_string;
use super::value_objects::{image_name, validate_element_id, LEGACY_QUESTION_ID};
use super::{Item, Question, SelectionMode, SurveyError, SurveyId};
use crate::domain::timestamp;

/// Survey 聚合根
///
/// 不变量:
/// - 至少一个问题，每个问题至少一个选项
/// - 问题 ID 在问卷内唯一，选项 ID 在问题内唯一
/// - `first_response_at` 只在第一次提交时写入，重置时清空
///
/// 持久化时总是写 `questions`；旧版只有 `items` 的记录在读取时迁移为单个问题。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SurveyRecord")]
pub struct Survey {
    pub id: SurveyId,
    pub title_en: String,
    pub title_sv: String,
    pub description_en: String,
    pub description_sv: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_button_text_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_button_text_sv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<String>,
    pub questions: Vec<Question>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp::option")]
    pub first_response_at: Option<DateTime<Utc>>,
}

/// 问卷的可编辑部分（创建 / 更新时整体替换）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyContent {
    pub title_en: String,
    pub title_sv: String,
    pub description_en: String,
    pub description_sv: String,
    pub start_button_text_en: Option<String>,
    pub start_button_text_sv: Option<String>,
    pub hero_image: Option<String>,
    pub questions: Vec<Question>,
}

/// 复制问卷时需要复制的图片文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCopy {
    pub from: String,
    pub to: String,
}

impl Survey {
    /// 创建新问卷
    pub fn new(id: SurveyId, content: SurveyContent, now: DateTime<Utc>) -> Self {
        let mut survey = Self {
            id,
            title_en: String::new(),
            title_sv: String::new(),
            description_en: String::new(),
            description_sv: String::new(),
            start_button_text_en: None,
            start_button_text_sv: None,
            hero_image: None,
            questions: Vec::new(),
            created_at: now,
            first_response_at: None,
        };
        survey.apply(content);
        survey
    }

    /// 用新内容替换可编辑字段，保留 ID 与时间戳
    pub fn apply(&mut self, content: SurveyContent) {
        self.title_en = content.title_en;
        self.title_sv = content.title_sv;
        self.description_en = content.description_en;
        self.description_sv = content.description_sv;
        self.start_button_text_en = content.start_button_text_en;
        self.start_button_text_sv = content.start_button_text_sv;
        self.hero_image = content.hero_image;
        self.questions = content.questions;
    }

    /// 校验结构不变量
    pub fn validate(&self) -> Result<(), SurveyError> {
        validate_questions(&self.questions)
    }

    pub fn find_question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn items(&self) -> impl Iterator<Item = (&Question, &Item)> {
        self.questions
            .iter()
            .flat_map(|q| q.items.iter().map(move |item| (q, item)))
    }

    /// 问卷引用的全部图片文件名（选项图片 + 封面）
    pub fn image_names(&self) -> BTreeSet<String> {
        self.items()
            .filter_map(|(_, item)| item.image.clone())
            .chain(self.hero_image.clone())
            .collect()
    }

    /// 记录第一次提交时间，已有值时不变
    ///
    /// 返回是否发生了修改
    pub fn mark_first_response(&mut self, at: DateTime<Utc>) -> bool {
        if self.first_response_at.is_some() {
            return false;
        }
        self.first_response_at = Some(at);
        true
    }

    pub fn clear_first_response(&mut self) {
        self.first_response_at = None;
    }

    /// 移除对某个图片文件的引用（选项与封面）
    pub fn detach_image(&mut self, name: &str) {
        for item in self.questions.iter_mut().flat_map(|q| q.items.iter_mut()) {
            if item.image.as_deref() == Some(name) {
                item.image = None;
            }
        }
        if self.hero_image.as_deref() == Some(name) {
            self.hero_image = None;
        }
    }

    /// 把对 `from` 的引用改为 `to`
    pub fn rename_image(&mut self, from: &str, to: &str) {
        for item in self.questions.iter_mut().flat_map(|q| q.items.iter_mut()) {
            if item.image.as_deref() == Some(from) {
                item.image = Some(to.to_string());
            }
        }
        if self.hero_image.as_deref() == Some(from) {
            self.hero_image = Some(to.to_string());
        }
    }

    /// 复制问卷：选项 ID 变为 `{newId}_{oldItemId}`，图片按新 ID 重新命名
    pub fn duplicate(
        &self,
        new_id: SurveyId,
        title_en: String,
        title_sv: String,
        now: DateTime<Utc>,
    ) -> (Survey, Vec<ImageCopy>) {
        let prefix = new_id.to_string();
        let (mut copy, images) = self.copy_under(new_id, |item_id| format!("{}_{}", prefix, item_id));
        copy.title_en = title_en;
        copy.title_sv = title_sv;
        copy.created_at = now;
        copy.first_response_at = None;
        (copy, images)
    }

    /// 以新 ID 重新登记（导入用），选项 ID 不变，图片按新 ID 重新命名
    pub fn rekey(&self, new_id: SurveyId) -> (Survey, Vec<ImageCopy>) {
        let (mut copy, images) = self.copy_under(new_id, |item_id| item_id.to_string());
        copy.first_response_at = None;
        (copy, images)
    }

    fn copy_under(
        &self,
        new_id: SurveyId,
        item_id: impl Fn(&str) -> String,
    ) -> (Survey, Vec<ImageCopy>) {
        let mut images = Vec::new();
        let mut copy = self.clone();

        for question in &mut copy.questions {
            for item in &mut question.items {
                item.id = item_id(&item.id);
                if let Some(old) = item.image.take() {
                    let ext = image_name::extension(&old).unwrap_or_else(|| "webp".to_string());
                    let new = image_name::item(&new_id, &question.id, &item.id, &ext);
                    images.push(ImageCopy { from: old, to: new.clone() });
                    item.image = Some(new);
                }
            }
        }

        if let Some(old) = copy.hero_image.take() {
            let ext = image_name::extension(&old).unwrap_or_else(|| "webp".to_string());
            let new = image_name::hero(&new_id, &ext);
            images.push(ImageCopy { from: old, to: new.clone() });
            copy.hero_image = Some(new);
        }

        copy.id = new_id;
        (copy, images)
    }
}

/// 校验问题列表
pub fn validate_questions(questions: &[Question]) -> Result<(), SurveyError> {
    if questions.is_empty() {
        return Err(SurveyError::NoQuestions);
    }

    let mut question_ids = HashSet::new();
    for question in questions {
        validate_element_id(&question.id)?;
        if !question_ids.insert(question.id.as_str()) {
            return Err(SurveyError::DuplicateQuestion(question.id.clone()));
        }
        if question.items.is_empty() {
            return Err(SurveyError::EmptyQuestion(question.id.clone()));
        }

        let mut item_ids = HashSet::new();
        for item in &question.items {
            validate_element_id(&item.id)?;
            if !item_ids.insert(item.id.as_str()) {
                return Err(SurveyError::DuplicateItem {
                    question: question.id.clone(),
                    item: item.id.clone(),
                });
            }
        }
    }

    Ok(())
}

/// 旧版扁平 `items` 迁移为单个多选问题
pub fn legacy_question(title_en: &str, title_sv: &str, items: Vec<Item>) -> Question {
    Question {
        id: LEGACY_QUESTION_ID.to_string(),
        text_en: title_en.to_string(),
        text_sv: title_sv.to_string(),
        selection_mode: SelectionMode::Multiple,
        items,
    }
}

/// 存储层的 Survey 形状（兼容 `items` / `questions` 两种格式）
#[derive(Deserialize)]
struct SurveyRecord {
    #[serde(deserialize_with = "id_string")]
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    title_en: Option<String>,
    #[serde(default)]
    title_sv: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    description_en: Option<String>,
    #[serde(default)]
    description_sv: Option<String>,
    #[serde(default)]
    start_button_text_en: Option<String>,
    #[serde(default)]
    start_button_text_sv: Option<String>,
    #[serde(default)]
    hero_image: Option<String>,
    #[serde(default)]
    items: Option<Vec<Item>>,
    #[serde(default)]
    questions: Option<Vec<Question>>,
    #[serde(default, with = "timestamp::option")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::option")]
    first_response_at: Option<DateTime<Utc>>,
}

impl From<SurveyRecord> for Survey {
    fn from(raw: SurveyRecord) -> Self {
        let title = raw.title.unwrap_or_default();
        let description = raw.description.unwrap_or_default();
        let title_en = raw.title_en.unwrap_or_else(|| title.clone());
        let title_sv = raw.title_sv.unwrap_or(title);

        let questions = match (raw.questions, raw.items) {
            (Some(questions), _) => questions,
            (None, Some(items)) => vec![legacy_question(&title_en, &title_sv, items)],
            (None, None) => Vec::new(),
        };

        Self {
            id: SurveyId::new(raw.id),
            title_en,
            title_sv,
            description_en: raw.description_en.unwrap_or_else(|| description.clone()),
            description_sv: raw.description_sv.unwrap_or(description),
            start_button_text_en: raw.start_button_text_en.filter(|s| !s.is_empty()),
            start_button_text_sv: raw.start_button_text_sv.filter(|s| !s.is_empty()),
            hero_image: raw.hero_image.filter(|s| !s.is_empty()),
            questions,
            created_at: raw.created_at.unwrap_or_else(Utc::now),
            first_response_at: raw.first_response_at,
        }
    }
}
