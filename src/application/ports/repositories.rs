//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（JSON 文件）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::domain::response::Response;
use crate::domain::survey::{Survey, SurveyContent, SurveyId};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

// ============================================================================
// Survey Repository
// ============================================================================

/// 替换问卷内容的结果
#[derive(Debug, Clone)]
pub struct ContentReplaced {
    /// 替换前引用的图片
    pub previous_images: BTreeSet<String>,
    /// 替换后的问卷
    pub survey: Survey,
}

/// Survey Repository Port
#[async_trait]
pub trait SurveyRepositoryPort: Send + Sync {
    /// 获取所有问卷（按存储顺序）
    async fn find_all(&self) -> Result<Vec<Survey>, RepositoryError>;

    /// 根据 ID 查找问卷
    async fn find_by_id(&self, id: &SurveyId) -> Result<Option<Survey>, RepositoryError>;

    /// 下一个可用 ID（现有最大数字 ID + 1）
    async fn next_id(&self) -> Result<SurveyId, RepositoryError>;

    /// 保存问卷（存在则替换，不存在则追加）
    async fn save(&self, survey: &Survey) -> Result<(), RepositoryError>;

    /// 在当前记录上替换可编辑内容，保留 ID 与时间戳；问卷不存在时返回 None
    async fn replace_content(
        &self,
        id: &SurveyId,
        content: SurveyContent,
    ) -> Result<Option<ContentReplaced>, RepositoryError>;

    /// 删除问卷，返回是否存在
    async fn delete(&self, id: &SurveyId) -> Result<bool, RepositoryError>;

    /// 若 `first_response_at` 未设置则写入，返回是否发生修改
    async fn mark_first_response(
        &self,
        id: &SurveyId,
        at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError>;

    /// 清空 `first_response_at`
    async fn clear_first_response(&self, id: &SurveyId) -> Result<(), RepositoryError>;
}

// ============================================================================
// Response Repository
// ============================================================================

/// Response Repository Port
#[async_trait]
pub trait ResponseRepositoryPort: Send + Sync {
    /// 追加一条答卷
    async fn append(&self, response: &Response) -> Result<(), RepositoryError>;

    /// 获取某问卷的全部答卷
    async fn find_by_survey(&self, survey_id: &SurveyId) -> Result<Vec<Response>, RepositoryError>;

    /// 删除某问卷的全部答卷，返回删除数量
    async fn delete_by_survey(&self, survey_id: &SurveyId) -> Result<usize, RepositoryError>;
}
