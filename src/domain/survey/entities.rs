//! Survey Context - Entities

use serde::{Deserialize, Serialize};

use super::SelectionMode;

/// 可选项
///
/// 旧数据只有单个 `text` 字段，读取时复制到两种语言。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ItemRecord")]
pub struct Item {
    pub id: String,
    pub text_en: String,
    pub text_sv: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Item {
    pub fn new(id: impl Into<String>, text_en: impl Into<String>, text_sv: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text_en: text_en.into(),
            text_sv: text_sv.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// 存储层的 Item 形状（兼容旧格式）
#[derive(Deserialize)]
struct ItemRecord {
    #[serde(deserialize_with = "id_string")]
    id: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    text_en: Option<String>,
    #[serde(default)]
    text_sv: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

impl From<ItemRecord> for Item {
    fn from(raw: ItemRecord) -> Self {
        let legacy = raw.text.unwrap_or_default();
        Self {
            id: raw.id,
            text_en: raw.text_en.unwrap_or_else(|| legacy.clone()),
            text_sv: raw.text_sv.unwrap_or(legacy),
            image: raw.image.filter(|name| !name.is_empty()),
        }
    }
}

/// 问题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub text_en: String,
    #[serde(default)]
    pub text_sv: String,
    #[serde(default)]
    pub selection_mode: SelectionMode,
    #[serde(default)]
    pub items: Vec<Item>,
}

/// 旧数据里的 ID 可能是数字，统一读成字符串
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    value_to_id(serde_json::Value::deserialize(deserializer)?)
}

/// `id_string` 的列表版本
pub(crate) fn id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Vec::<serde_json::Value>::deserialize(deserializer)?
        .into_iter()
        .map(value_to_id)
        .collect()
}

fn value_to_id<E: serde::de::Error>(value: serde_json::Value) -> Result<String, E> {
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(E::custom(format!("invalid id: {}", other))),
    }
}
