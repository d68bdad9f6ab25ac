//! HTTP Server
//!
//! Axum HTTP 服务器启动和配置

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::Router;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderValue, Method};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::middleware::error_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 允许跨域携带 Cookie 的前端 Origin
    pub frontend_url: String,
    /// 请求体大小上限（base64 图片）
    pub max_body_bytes: usize,
    /// 上传图片目录，挂载在 `/images`
    pub images_dir: PathBuf,
    /// 前端构建目录，设置后作为 SPA 托管
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            frontend_url: "http://localhost:5173".to_string(),
            max_body_bytes: 10 * 1024 * 1024,
            images_dir: PathBuf::from("data/images"),
            static_dir: None,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl From<&crate::config::AppConfig> for ServerConfig {
    fn from(config: &crate::config::AppConfig) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            frontend_url: config.server.frontend_url.clone(),
            max_body_bytes: config.server.max_body_bytes,
            images_dir: config.storage.images_dir(),
            static_dir: config
                .server
                .static_files
                .enabled
                .then(|| config.server.static_files.dir.clone()),
        }
    }
}

/// HTTP 服务器
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    /// 创建新的 HTTP 服务器
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// 构建 Router
    pub fn build_router(&self) -> Router {
        build_router(&self.config, self.state.clone())
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();
        let addr = self.config.addr();

        info!("Starting HTTP server on {} (with graceful shutdown)", addr);

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal)
        .await?;

        Ok(())
    }
}

/// 组装完整的 Router：API + 图片 + 前端
pub fn build_router(config: &ServerConfig, state: Arc<AppState>) -> Router {
    // CORS 配置 - 只允许前端 Origin，并允许携带 Cookie
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600));
    match HeaderValue::from_str(&config.frontend_url) {
        Ok(origin) => cors = cors.allow_origin(origin),
        Err(e) => tracing::warn!(
            frontend_url = %config.frontend_url,
            error = %e,
            "Invalid frontend URL, cross-origin requests will be rejected"
        ),
    }

    let mut router = create_routes(state.clone())
        .nest_service("/images", ServeDir::new(&config.images_dir));

    if let Some(dir) = &config.static_dir {
        info!("Serving frontend from {:?}", dir);
        let index = dir.join("index.html");
        router = router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
    }

    router
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(middleware::from_fn(error_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
