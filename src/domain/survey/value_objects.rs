//! Survey Context - Value Objects

use serde::{Deserialize, Serialize};

use super::SurveyError;

/// 旧版 `items` 格式迁移后使用的问题 ID
pub const LEGACY_QUESTION_ID: &str = "q1";

/// 问卷 ID（十进制递增字符串："1", "2", ...）
///
/// 早期数据里 ID 可能是数字，反序列化时一并接受。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SurveyId(String);

impl<'de> Deserialize<'de> for SurveyId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        super::entities::id_string(deserializer).map(Self)
    }
}

impl SurveyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// 计算下一个 ID：现有数字 ID 的最大值 + 1
    ///
    /// 非数字 ID 不参与计算；空集合返回 "1"。
    pub fn next<'a>(existing: impl IntoIterator<Item = &'a SurveyId>) -> Self {
        let max = existing
            .into_iter()
            .filter_map(|id| id.0.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self((max + 1).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SurveyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SurveyId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// 问题的选择模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// 单选
    Single,
    /// 多选
    #[default]
    Multiple,
}

impl SelectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMode::Single => "single",
            SelectionMode::Multiple => "multiple",
        }
    }
}

/// 校验问题 / 选项 ID
///
/// ID 会拼进图片文件名，只允许 `[A-Za-z0-9_-]`。
pub fn validate_element_id(id: &str) -> Result<(), SurveyError> {
    let valid = !id.is_empty()
        && id.len() <= 64
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(SurveyError::InvalidId(id.to_string()))
    }
}

/// 图片文件名规则
pub mod image_name {
    use super::SurveyId;

    /// 选项图片：`{surveyId}_{questionId}_{itemId}.{ext}`
    pub fn item(survey_id: &SurveyId, question_id: &str, item_id: &str, ext: &str) -> String {
        format!("{}_{}_{}.{}", survey_id, question_id, item_id, ext)
    }

    /// 封面图片：`{surveyId}_hero.{ext}`
    pub fn hero(survey_id: &SurveyId, ext: &str) -> String {
        format!("{}_hero.{}", survey_id, ext)
    }

    /// 同名冲突时的备选文件名：`{stem}-{n}.{ext}`
    pub fn variant(name: &str, n: usize) -> String {
        match name.rsplit_once('.') {
            Some((stem, ext)) => format!("{}-{}.{}", stem, n, ext),
            None => format!("{}-{}", name, n),
        }
    }

    /// 取文件扩展名（小写），无扩展名时返回 None
    pub fn extension(name: &str) -> Option<String> {
        std::path::Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }

    /// 是否为单纯的文件名（不含路径分隔符、不以点开头）
    pub fn is_plain(name: &str) -> bool {
        !name.is_empty()
            && !name.starts_with('.')
            && !name.contains(['/', '\\'])
            && !name.contains("..")
    }
}
