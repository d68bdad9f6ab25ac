//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{ImageError, ImageStorageError, RepositoryError};
use crate::domain::survey::SurveyError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 未认证
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建未认证错误
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        Self::RepositoryError(err.to_string())
    }
}

impl From<ImageStorageError> for ApplicationError {
    fn from(err: ImageStorageError) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<SurveyError> for ApplicationError {
    fn from(err: SurveyError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<ImageError> for ApplicationError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::EncodeError(msg) => Self::InternalError(format!("Failed to encode image: {}", msg)),
            other => Self::ValidationError(other.to_string()),
        }
    }
}
