//! HTTP Routes
//!
//! API Endpoints:
//! - /api/health                          GET     健康检查
//! - /api/config                          GET     Kiosk 前端配置
//! - /api/surveys                         GET     列出问卷
//! - /api/surveys/:id                     GET     获取问卷
//! - /api/surveys/:id/submit              POST    提交答卷
//! - /api/admin/login                     POST    管理员登录
//! - /api/admin/logout                    POST    管理员登出
//! - /api/admin/status                    GET     登录状态
//! - /api/admin/surveys                   POST    创建问卷          (需登录)
//! - /api/admin/surveys/export            GET     导出问卷包        (需登录)
//! - /api/admin/surveys/import            POST    导入问卷包        (需登录)
//! - /api/admin/surveys/:id               PUT     更新问卷          (需登录)
//! - /api/admin/surveys/:id               DELETE  删除问卷          (需登录)
//! - /api/admin/surveys/:id/duplicate     POST    复制问卷          (需登录)
//! - /api/admin/surveys/:id/reset         POST    清空答卷          (需登录)
//! - /api/admin/surveys/:id/results       GET     统计结果          (需登录)

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::middleware::{rate_limit, require_admin};
use super::state::AppState;

/// 创建所有 API 路由
pub fn create_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes(state))
}

/// API 路由（整体限流）
fn api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::kiosk_config))
        .nest("/surveys", survey_routes())
        .nest("/admin", admin_routes(state.clone()))
        .layer(middleware::from_fn_with_state(state, rate_limit))
}

/// Kiosk 端问卷路由
fn survey_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::list_surveys))
        .route("/:id", get(handlers::get_survey))
        .route("/:id/submit", post(handlers::submit_response))
}

/// 管理员路由
fn admin_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/status", get(handlers::auth_status))
        .nest("/surveys", admin_survey_routes(state))
}

/// 问卷管理路由（需要管理员会话）
fn admin_survey_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::create_survey))
        .route("/export", get(handlers::export_surveys))
        .route("/import", post(handlers::import_surveys))
        .route(
            "/:id",
            put(handlers::update_survey).delete(handlers::delete_survey),
        )
        .route("/:id/duplicate", post(handlers::duplicate_survey))
        .route("/:id/reset", post(handlers::reset_survey))
        .route("/:id/results", get(handlers::survey_results))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}
