//! File Storage - 文件系统图片存储实现
//!
//! 实现 ImageStoragePort trait

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{ImageStorageError, ImageStoragePort};
use crate::domain::survey::image_name;

/// 文件系统图片存储
pub struct FileImageStorage {
    /// 存储根目录（同时由 `/images` 静态服务读取）
    base_dir: PathBuf,
}

impl FileImageStorage {
    /// 创建新的文件存储
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, ImageStorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| ImageStorageError::IoError(e.to_string()))?;

        Ok(Self { base_dir })
    }

    /// 获取存储根目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn path_of(&self, name: &str) -> Result<PathBuf, ImageStorageError> {
        if !image_name::is_plain(name) {
            return Err(ImageStorageError::InvalidName(name.to_string()));
        }
        Ok(self.base_dir.join(name))
    }
}

#[async_trait]
impl ImageStoragePort for FileImageStorage {
    async fn save(&self, name: &str, data: &[u8]) -> Result<(), ImageStorageError> {
        let path = self.path_of(name)?;

        fs::write(&path, data)
            .await
            .map_err(|e| ImageStorageError::IoError(e.to_string()))?;

        tracing::debug!(image = %name, size = data.len(), "Saved image");

        Ok(())
    }

    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, ImageStorageError> {
        let path = self.path_of(name)?;

        match fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ImageStorageError::IoError(e.to_string())),
        }
    }

    async fn copy(&self, from: &str, to: &str) -> Result<bool, ImageStorageError> {
        let source = self.path_of(from)?;
        let target = self.path_of(to)?;

        match fs::copy(&source, &target).await {
            Ok(_) => {
                tracing::debug!(from = %from, to = %to, "Copied image");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ImageStorageError::IoError(e.to_string())),
        }
    }

    async fn delete(&self, name: &str) -> Result<bool, ImageStorageError> {
        let path = self.path_of(name)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(image = %name, "Deleted image");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ImageStorageError::IoError(e.to_string())),
        }
    }
}
