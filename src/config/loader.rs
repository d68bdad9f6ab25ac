//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 部署沿用的无前缀环境变量（PORT、ADMIN_PASSWORD 等）
//! 2. 环境变量（前缀 `KIOSK_`）
//! 3. 配置文件（config.toml）
//! 4. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 会话有效期上限（一年）
const MAX_SESSION_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 无前缀环境变量 → 配置键
const LEGACY_ENV_VARS: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("FRONTEND_URL", "server.frontend_url"),
    ("ADMIN_PASSWORD", "admin.password"),
    ("SESSION_SECRET", "admin.session_secret"),
    ("DATA_DIR", "storage.data_dir"),
    ("APP_NAME", "kiosk.app_name"),
    ("THANK_YOU_COUNTDOWN", "kiosk.thank_you_countdown"),
    ("INACTIVITY_TIMEOUT", "kiosk.inactivity_timeout"),
];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 无前缀环境变量（`PORT`、`ADMIN_PASSWORD`、`NODE_ENV=production` 等）
/// 2. 环境变量（前缀 `KIOSK_`，层级分隔符 `__`）
/// 3. 配置文件（config.toml 或 config.local.toml）
/// 4. 默认值
///
/// # 环境变量示例
/// - `KIOSK_SERVER__PORT=8080`
/// - `KIOSK_RATE_LIMIT__MAX_REQUESTS=500`
/// - `KIOSK_STORAGE__DATA_DIR=/var/lib/kiosk`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_with(config_path, |name| std::env::var(name).ok())
}

fn load_with(
    config_path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3001)?
        .set_default("server.frontend_url", "http://localhost:5173")?
        .set_default("server.production", false)?
        .set_default("server.max_body_bytes", 10 * 1024 * 1024)?
        .set_default("admin.password", "admin123")?
        .set_default("admin.session_secret", "your-secret-key-change-in-production")?
        .set_default("admin.session_ttl_secs", 86400)?
        .set_default("storage.data_dir", "data")?
        .set_default("kiosk.app_name", "Zuptalo")?
        .set_default("kiosk.thank_you_countdown", 5)?
        .set_default("kiosk.inactivity_timeout", 30)?
        .set_default("images.item_max_width", 800)?
        .set_default("images.hero_max_width", 1200)?
        .set_default("rate_limit.enabled", true)?
        .set_default("rate_limit.max_requests", 100)?
        .set_default("rate_limit.window_secs", 900)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        // 搜索默认配置文件
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量
    // 前缀: KIOSK_
    // 层级分隔符: __ (双下划线)
    // 例如: KIOSK_ADMIN__SESSION_TTL_SECS=3600
    builder = builder.add_source(
        Environment::with_prefix("KIOSK")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 无前缀环境变量（最高优先级）
    for (key, value) in legacy_overrides(lookup) {
        builder = builder.set_override(key, value)?;
    }

    // 5. 构建配置
    let config = builder.build()?;

    // 6. 反序列化为 AppConfig
    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    // 7. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 收集已设置的无前缀环境变量
fn legacy_overrides(lookup: impl Fn(&str) -> Option<String>) -> Vec<(&'static str, String)> {
    let mut overrides: Vec<(&'static str, String)> = LEGACY_ENV_VARS
        .iter()
        .filter_map(|(var, key)| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .map(|v| (*key, v))
        })
        .collect();

    if let Some(env) = lookup("NODE_ENV") {
        let production = env.eq_ignore_ascii_case("production");
        overrides.push(("server.production", production.to_string()));
    }

    overrides
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    // 验证端口范围
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.admin.password.is_empty() {
        return Err(ConfigError::ValidationError(
            "Admin password cannot be empty".to_string(),
        ));
    }

    if config.admin.session_secret.is_empty() {
        return Err(ConfigError::ValidationError(
            "Session secret cannot be empty".to_string(),
        ));
    }

    if config.admin.session_ttl_secs == 0 || config.admin.session_ttl_secs > MAX_SESSION_TTL_SECS {
        return Err(ConfigError::ValidationError(format!(
            "Session TTL must be between 1 and {} seconds",
            MAX_SESSION_TTL_SECS
        )));
    }

    if config.images.item_max_width == 0 || config.images.hero_max_width == 0 {
        return Err(ConfigError::ValidationError(
            "Image max width cannot be 0".to_string(),
        ));
    }

    // 验证限流配置
    if config.rate_limit.enabled
        && (config.rate_limit.window_secs == 0 || config.rate_limit.max_requests == 0)
    {
        return Err(ConfigError::ValidationError(
            "Rate limit window and budget cannot be 0 when rate limiting is enabled".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Frontend URL: {}", config.server.frontend_url);
    tracing::info!("Production: {}", config.server.production);
    tracing::info!("Max Body: {} bytes", config.server.max_body_bytes);
    if config.server.static_files.enabled {
        tracing::info!("Static Files: {:?}", config.server.static_files.dir);
    }
    tracing::info!("Admin Password: {}", mask(&config.admin.password));
    tracing::info!("Session TTL: {}s", config.admin.session_ttl_secs);
    tracing::info!("Data Directory: {:?}", config.storage.data_dir);
    tracing::info!("App Name: {}", config.kiosk.app_name);
    tracing::info!(
        "Kiosk Timers: thank-you {}s, inactivity {}s",
        config.kiosk.thank_you_countdown,
        config.kiosk.inactivity_timeout
    );
    tracing::info!(
        "Image Widths: item {}px, hero {}px",
        config.images.item_max_width,
        config.images.hero_max_width
    );
    tracing::info!("Rate Limit Enabled: {}", config.rate_limit.enabled);
    if config.rate_limit.enabled {
        tracing::info!(
            "Rate Limit: {} requests / {}s",
            config.rate_limit.max_requests,
            config.rate_limit.window_secs
        );
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

fn mask(secret: &str) -> String {
    "*".repeat(secret.chars().count().min(8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_default_config() {
        let file = config_file("");
        let config = load_with(Some(file.path()), env(&[])).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3001);
        assert!(!config.server.production);
        assert_eq!(config.images.hero_max_width, 1200);
    }

    #[test]
    fn test_file_values_are_applied() {
        let file = config_file(
            "[server]\nport = 8080\n\n[kiosk]\napp_name = \"Lunchkollen\"\n\n[rate_limit]\nenabled = false\n",
        );
        let config = load_with(Some(file.path()), env(&[])).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.kiosk.app_name, "Lunchkollen");
        assert!(!config.rate_limit.enabled);
    }

    #[test]
    fn test_legacy_env_vars_override_file() {
        let file = config_file("[server]\nport = 8080\n");
        let config = load_with(
            Some(file.path()),
            env(&[
                ("PORT", "9090"),
                ("ADMIN_PASSWORD", "s3cret"),
                ("NODE_ENV", "production"),
                ("THANK_YOU_COUNTDOWN", "8"),
                ("DATA_DIR", "/var/lib/kiosk"),
            ]),
        )
        .unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.admin.password, "s3cret");
        assert!(config.server.production);
        assert_eq!(config.kiosk.thank_you_countdown, 8);
        assert_eq!(config.storage.data_dir, std::path::PathBuf::from("/var/lib/kiosk"));
    }

    #[test]
    fn test_blank_legacy_env_var_is_ignored() {
        let overrides = legacy_overrides(env(&[("ADMIN_PASSWORD", "  ")]));
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_password() {
        let mut config = AppConfig::default();
        config.admin.password = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_out_of_range_session_ttl() {
        let mut config = AppConfig::default();
        config.admin.session_ttl_secs = u64::MAX;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));

        config.admin.session_ttl_secs = 0;
        assert!(validate_config(&config).is_err());

        config.admin.session_ttl_secs = MAX_SESSION_TTL_SECS;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_rate_window() {
        let mut config = AppConfig::default();
        config.rate_limit.window_secs = 0;
        assert!(validate_config(&config).is_err());

        config.rate_limit.enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask("admin123"), "********");
        assert_eq!(mask("abc"), "***");
    }
}
