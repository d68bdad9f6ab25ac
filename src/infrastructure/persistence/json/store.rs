//! JSON 数组文件存储
//!
//! 整个文件是一个 JSON 数组。每次读改写都持有同一把异步锁，
//! 写入先落到临时文件再 rename 覆盖，读者永远看不到写了一半的文件。

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::application::ports::RepositoryError;

/// JSON 文件存储
pub struct JsonFileStore<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取全部记录
    pub async fn load(&self) -> Result<Vec<T>, RepositoryError> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    /// 读改写
    ///
    /// 闭包返回 `(结果, 是否写回)`；不需要写回时文件保持不变。
    pub async fn update<R, F>(&self, f: F) -> Result<R, RepositoryError>
    where
        F: FnOnce(&mut Vec<T>) -> (R, bool),
    {
        let _guard = self.lock.lock().await;
        let mut records = self.read().await?;
        let (result, dirty) = f(&mut records);
        if dirty {
            self.write(&records).await?;
        }
        Ok(result)
    }

    async fn read(&self) -> Result<Vec<T>, RepositoryError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RepositoryError::IoError(e.to_string())),
        };

        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Malformed JSON store");
            RepositoryError::SerializationError(format!("{}: {}", self.path.display(), e))
        })
    }

    async fn write(&self, records: &[T]) -> Result<(), RepositoryError> {
        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RepositoryError::IoError(e.to_string()))?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| RepositoryError::IoError(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| RepositoryError::IoError(e.to_string()))?;

        tracing::debug!(path = %self.path.display(), records = records.len(), "JSON store written");
        Ok(())
    }
}
