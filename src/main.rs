//! Survey Kiosk - 双语问卷自助终端后端
//!
//! - Domain: survey/, response/, results
//! - Application: commands, queries, ports
//! - Infrastructure: http, memory, persistence, adapters

use std::sync::Arc;
use std::time::Duration;

use survey_kiosk::config::{load_config, print_config, AppConfig};
use survey_kiosk::infrastructure::adapters::{FileImageStorage, ImageOptimizer, ImageOptimizerConfig};
use survey_kiosk::infrastructure::http::{AppState, HttpServer, ServerConfig};
use survey_kiosk::infrastructure::memory::InMemorySessionManager;
use survey_kiosk::infrastructure::persistence::{JsonResponseRepository, JsonSurveyRepository};
use survey_kiosk::application::SessionManagerPort;
use tracing_subscriber::EnvFilter;

/// 过期会话与限流窗口的清理间隔
const HOUSEKEEPING_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 中的变量先于配置加载
    dotenvy::dotenv().ok();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Survey Kiosk v{}", env!("CARGO_PKG_VERSION"));
    print_config(&config);

    // 确保数据目录存在
    tokio::fs::create_dir_all(&config.storage.data_dir).await?;

    // 创建 Repository 适配器
    let survey_repo = Arc::new(JsonSurveyRepository::new(config.storage.surveys_file()));
    let response_repo = Arc::new(JsonResponseRepository::new(config.storage.responses_file()));

    // 图片存储与优化
    let image_storage = Arc::new(FileImageStorage::new(config.storage.images_dir()).await?);
    tracing::info!(dir = %image_storage.base_dir().display(), "Image storage ready");
    let image_processor = Arc::new(ImageOptimizer::new(ImageOptimizerConfig {
        item_max_width: config.images.item_max_width,
        hero_max_width: config.images.hero_max_width,
    }));

    let session_manager = Arc::new(InMemorySessionManager::new());

    let state = AppState::new(
        &config,
        survey_repo,
        response_repo,
        image_storage,
        image_processor,
        session_manager.clone(),
    );

    // 定期清理过期会话与限流窗口
    let rate_limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(HOUSEKEEPING_INTERVAL);
        loop {
            ticker.tick().await;
            session_manager.purge_expired();
            if let Some(limiter) = &rate_limiter {
                let purged = limiter.purge_stale();
                if purged > 0 {
                    tracing::debug!(purged = purged, "Stale rate limit windows purged");
                }
            }
        }
    });

    let server = HttpServer::new(ServerConfig::from(&config), state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 初始化日志：RUST_LOG 优先，其次为配置中的级别
fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},survey_kiosk={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
