//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 管理员认证配置
    #[serde(default)]
    pub admin: AdminConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 前端 Kiosk 配置（通过 /api/config 下发）
    #[serde(default)]
    pub kiosk: KioskConfig,

    /// 图片优化配置
    #[serde(default)]
    pub images: ImagesConfig,

    /// 限流配置
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 前端来源（CORS 允许的唯一 Origin）
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,

    /// 生产模式：Cookie 带 Secure 标记
    #[serde(default)]
    pub production: bool,

    /// 请求体最大大小（字节），默认 10MB
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// 静态文件服务配置
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

/// 静态文件服务配置（前端构建产物 + SPA 回退）
#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    /// 是否启用静态文件服务
    #[serde(default = "default_static_enabled")]
    pub enabled: bool,

    /// 静态文件目录
    #[serde(default = "default_static_dir")]
    pub dir: PathBuf,
}

fn default_static_enabled() -> bool {
    false
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("frontend/dist")
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: default_static_enabled(),
            dir: default_static_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_frontend_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024 // 10 MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            frontend_url: default_frontend_url(),
            production: false,
            max_body_bytes: default_max_body_bytes(),
            static_files: StaticFilesConfig::default(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 管理员认证配置
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// 管理员口令
    #[serde(default = "default_admin_password")]
    pub password: String,

    /// Cookie 签名密钥
    #[serde(default = "default_session_secret")]
    pub session_secret: String,

    /// 会话有效期（秒）
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

fn default_session_secret() -> String {
    "your-secret-key-change-in-production".to_string()
}

fn default_session_ttl() -> u64 {
    86400 // 24 小时
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password: default_admin_password(),
            session_secret: default_session_secret(),
            session_ttl_secs: default_session_ttl(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 数据目录（surveys.json、responses.json、images/）
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    pub fn surveys_file(&self) -> PathBuf {
        self.data_dir.join("surveys.json")
    }

    pub fn responses_file(&self) -> PathBuf {
        self.data_dir.join("responses.json")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.data_dir.join("images")
    }
}

/// Kiosk 前端配置
#[derive(Debug, Clone, Deserialize)]
pub struct KioskConfig {
    /// 应用名称
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// 感谢页倒计时（秒）
    #[serde(default = "default_thank_you_countdown")]
    pub thank_you_countdown: u32,

    /// 无操作返回首页的超时（秒）
    #[serde(default = "default_inactivity_timeout")]
    pub inactivity_timeout: u32,
}

fn default_app_name() -> String {
    "Zuptalo".to_string()
}

fn default_thank_you_countdown() -> u32 {
    5
}

fn default_inactivity_timeout() -> u32 {
    30
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            thank_you_countdown: default_thank_you_countdown(),
            inactivity_timeout: default_inactivity_timeout(),
        }
    }
}

/// 图片优化配置
#[derive(Debug, Clone, Deserialize)]
pub struct ImagesConfig {
    /// 选项图片最大宽度（像素）
    #[serde(default = "default_item_max_width")]
    pub item_max_width: u32,

    /// 封面图片最大宽度（像素）
    #[serde(default = "default_hero_max_width")]
    pub hero_max_width: u32,
}

fn default_item_max_width() -> u32 {
    800
}

fn default_hero_max_width() -> u32 {
    1200
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            item_max_width: default_item_max_width(),
            hero_max_width: default_hero_max_width(),
        }
    }
}

/// 限流配置（按 IP，作用于 /api）
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_rate_limit_enabled")]
    pub enabled: bool,

    /// 每个窗口内允许的请求数
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// 窗口长度（秒）
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

fn default_rate_limit_enabled() -> bool {
    true
}

fn default_max_requests() -> u32 {
    100
}

fn default_window_secs() -> u64 {
    900 // 15 分钟
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_rate_limit_enabled(),
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
