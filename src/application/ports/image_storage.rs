//! Image Storage Port - 出站端口
//!
//! 定义图片文件存储的抽象接口。文件名即 key，不允许包含路径。

use async_trait::async_trait;
use thiserror::Error;

/// 图片存储错误
#[derive(Debug, Error)]
pub enum ImageStorageError {
    #[error("Invalid image name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Image Storage Port
#[async_trait]
pub trait ImageStoragePort: Send + Sync {
    /// 写入图片（覆盖同名文件）
    async fn save(&self, name: &str, data: &[u8]) -> Result<(), ImageStorageError>;

    /// 读取图片，不存在时返回 None
    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, ImageStorageError>;

    /// 复制图片，源文件不存在时返回 false
    async fn copy(&self, from: &str, to: &str) -> Result<bool, ImageStorageError>;

    /// 删除图片，文件不存在时返回 false
    async fn delete(&self, name: &str) -> Result<bool, ImageStorageError>;
}
