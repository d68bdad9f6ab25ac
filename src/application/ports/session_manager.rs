//! Session Manager Port - 管理员会话生命周期管理
//!
//! 定义会话管理的抽象接口，具体实现在 infrastructure/memory 层

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Session Manager 错误
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Session already exists: {0}")]
    AlreadyExists(String),

    #[error("Session expired: {0}")]
    Expired(String),
}

/// 会话状态（in-memory）
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// 新建管理员会话，ID 随机生成
    pub fn admin(ttl_secs: u64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            admin: true,
            created_at: now,
            expires_at: now + Duration::seconds(ttl_secs as i64),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Session Manager Port
///
/// 所有状态存储在内存中，进程重启后失效
pub trait SessionManagerPort: Send + Sync {
    /// 创建新会话
    fn create(&self, session: Session) -> Result<String, SessionError>;

    /// 获取会话，过期会话会被移除并返回 `Expired`
    fn get(&self, id: &str) -> Result<Session, SessionError>;

    /// 销毁会话
    fn destroy(&self, id: &str) -> Result<(), SessionError>;

    /// 会话是否有效且带管理员标记
    fn is_admin(&self, id: &str) -> bool {
        self.get(id).map(|s| s.admin).unwrap_or(false)
    }

    /// 清理过期会话，返回清理数量
    fn purge_expired(&self) -> usize;

    /// 当前会话数量
    fn count(&self) -> usize;
}
