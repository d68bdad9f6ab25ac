//! Admin Auth Handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::SignedCookieJar;
use std::sync::Arc;

use crate::application::{LoginCommand, LogoutCommand};
use crate::infrastructure::http::dto::{AuthStatusResponse, LoginRequest, SuccessResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::{AppState, CookieKey};

/// 管理员登录，成功后下发新的签名会话 Cookie
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: SignedCookieJar<CookieKey>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(SignedCookieJar<CookieKey>, Json<SuccessResponse>), ApiError> {
    let Json(payload) = payload?;

    let command = LoginCommand {
        password: payload.password,
        previous_session: jar
            .get(state.session.cookie_name)
            .map(|c| c.value().to_string()),
    };
    let result = state.login_handler.handle(command)?;

    let cookie = Cookie::build((state.session.cookie_name, result.session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.session.secure)
        .max_age(time::Duration::seconds(state.session.ttl_secs as i64));

    Ok((jar.add(cookie), Json(SuccessResponse::ok())))
}

/// 管理员登出
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: SignedCookieJar<CookieKey>,
) -> (SignedCookieJar<CookieKey>, Json<SuccessResponse>) {
    let command = LogoutCommand {
        session_id: jar
            .get(state.session.cookie_name)
            .map(|c| c.value().to_string()),
    };
    state.logout_handler.handle(command);

    let jar = jar.remove(Cookie::build(state.session.cookie_name).path("/"));
    (jar, Json(SuccessResponse::ok()))
}

/// 当前会话是否已登录
pub async fn auth_status(
    State(state): State<Arc<AppState>>,
    jar: SignedCookieJar<CookieKey>,
) -> Json<AuthStatusResponse> {
    let authenticated = jar
        .get(state.session.cookie_name)
        .map(|c| state.session_manager.is_admin(c.value()))
        .unwrap_or(false);
    Json(AuthStatusResponse { authenticated })
}
