//! 导出 / 导入包格式
//!
//! ```json
//! {
//!   "version": 1,
//!   "exported_at": "2025-01-01T10:00:00.000Z",
//!   "surveys": [
//!     { "survey": { ... }, "images": { "1_q1_1.webp": "<base64>" } }
//!   ]
//! }
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::survey::Survey;
use crate::domain::timestamp;

/// 当前包格式版本
pub const BUNDLE_VERSION: u32 = 1;

/// 导出包
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyBundle {
    pub version: u32,
    #[serde(with = "timestamp")]
    pub exported_at: DateTime<Utc>,
    pub surveys: Vec<BundledSurvey>,
}

/// 包中的单个问卷及其图片（文件名 → base64）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundledSurvey {
    pub survey: Survey,
    #[serde(default)]
    pub images: BTreeMap<String, String>,
}

/// 解码 base64 图片数据，兼容 `data:<mime>;base64,` 前缀
pub fn decode_image_data(raw: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let payload = match raw.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => raw,
    };
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD.decode(compact)
}

/// 编码为 base64（无前缀）
pub fn encode_image_data(data: &[u8]) -> String {
    STANDARD.encode(data)
}
