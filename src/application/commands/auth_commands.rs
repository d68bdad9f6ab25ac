//! Auth Commands - 管理员登录 / 登出

/// 登录命令
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub password: String,
    /// 请求携带的旧会话 ID，登录成功后会被销毁（防止会话固定）
    pub previous_session: Option<String>,
}

/// 登录响应
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub session_id: String,
}

/// 登出命令
#[derive(Debug, Clone)]
pub struct LogoutCommand {
    pub session_id: Option<String>,
}
