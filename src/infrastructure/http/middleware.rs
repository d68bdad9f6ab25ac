//! HTTP Middleware
//!
//! - HTTP 状态码错误日志
//! - 管理员会话校验
//! - 按 IP 限流

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::SignedCookieJar;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use super::error::ApiError;
use super::state::{AppState, CookieKey};

/// HTTP 状态码错误日志中间件
///
/// 拦截 HTTP 响应，当状态码为 4xx 或 5xx 时记录日志
/// 注意：业务错误的详细信息在 ApiError::into_response() 中记录
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP client error"
        );
    }

    response
}

/// 管理员会话校验
///
/// 签名 Cookie 中的会话 ID 必须对应一个有效的管理员会话
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    jar: SignedCookieJar<CookieKey>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = jar
        .get(state.session.cookie_name)
        .map(|cookie| state.session_manager.is_admin(cookie.value()))
        .unwrap_or(false);

    if !authorized {
        return ApiError::Unauthorized("Unauthorized".to_string()).into_response();
    }

    next.run(request).await
}

/// 按客户端 IP 的固定窗口限流
///
/// 没有连接信息时（如测试中直接调用 Router）所有请求共用一个计数
pub async fn rate_limit(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(limiter) = state.rate_limiter.as_ref() else {
        return next.run(request).await;
    };

    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    let decision = limiter.check(ip);
    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        tracing::warn!(client_ip = %ip, "Rate limit exceeded");
        ApiError::TooManyRequests("Too many requests, please try again later.".to_string())
            .into_response()
    };

    let headers = response.headers_mut();
    for (name, value) in [
        ("ratelimit-limit", decision.limit as u64),
        ("ratelimit-remaining", decision.remaining as u64),
        ("ratelimit-reset", decision.reset_after.as_secs()),
    ] {
        headers.insert(HeaderName::from_static(name), HeaderValue::from(value));
    }

    response
}
