//! Auth Command Handlers

use std::sync::Arc;

use crate::application::commands::{LoginCommand, LoginResponse, LogoutCommand};
use crate::application::error::ApplicationError;
use crate::application::ports::{Session, SessionManagerPort};

/// Login Handler - 口令比对，成功后重新生成会话
pub struct LoginHandler {
    session_manager: Arc<dyn SessionManagerPort>,
    admin_password: String,
    session_ttl_secs: u64,
}

impl LoginHandler {
    pub fn new(
        session_manager: Arc<dyn SessionManagerPort>,
        admin_password: impl Into<String>,
        session_ttl_secs: u64,
    ) -> Self {
        Self {
            session_manager,
            admin_password: admin_password.into(),
            session_ttl_secs,
        }
    }

    pub fn handle(&self, cmd: LoginCommand) -> Result<LoginResponse, ApplicationError> {
        if cmd.password != self.admin_password {
            tracing::warn!("Admin login rejected");
            return Err(ApplicationError::unauthorized("Invalid password"));
        }

        // 旧会话作废，防止会话固定
        if let Some(previous) = cmd.previous_session.as_deref() {
            let _ = self.session_manager.destroy(previous);
        }

        let session_id = self
            .session_manager
            .create(Session::admin(self.session_ttl_secs))
            .map_err(|e| ApplicationError::internal(e.to_string()))?;

        tracing::info!("Admin logged in");

        Ok(LoginResponse { session_id })
    }
}

/// Logout Handler
pub struct LogoutHandler {
    session_manager: Arc<dyn SessionManagerPort>,
}

impl LogoutHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>) -> Self {
        Self { session_manager }
    }

    /// 登出总是成功，会话不存在时静默忽略
    pub fn handle(&self, cmd: LogoutCommand) {
        if let Some(id) = cmd.session_id.as_deref() {
            if self.session_manager.destroy(id).is_ok() {
                tracing::info!("Admin logged out");
            }
        }
    }
}
