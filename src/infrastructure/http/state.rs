//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use std::sync::Arc;
use std::time::Duration;

use crate::application::{
    // Command handlers
    CreateSurveyHandler, DeleteSurveyHandler, DuplicateSurveyHandler, ImportSurveysHandler,
    LoginHandler, LogoutHandler, ResetSurveyHandler, SubmitResponseHandler, UpdateSurveyHandler,
    // Query handlers
    ExportSurveysHandler, GetSurveyHandler, GetSurveyResultsHandler, ListSurveysHandler,
    // Ports
    ImageProcessorPort, ImageStoragePort, ResponseRepositoryPort, SessionManagerPort,
    SurveyRepositoryPort,
};
use crate::config::{AppConfig, KioskConfig};
use crate::infrastructure::memory::FixedWindowRateLimiter;

/// 会话相关设置
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Cookie 名称
    pub cookie_name: &'static str,
    /// 生产环境下 Cookie 带 Secure
    pub secure: bool,
    pub ttl_secs: u64,
}

/// 会话 Cookie 名称
pub const SESSION_COOKIE: &str = "kiosk.sid";

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub session_manager: Arc<dyn SessionManagerPort>,

    // ========== Command Handlers ==========
    pub create_survey_handler: CreateSurveyHandler,
    pub update_survey_handler: UpdateSurveyHandler,
    pub delete_survey_handler: DeleteSurveyHandler,
    pub duplicate_survey_handler: DuplicateSurveyHandler,
    pub reset_survey_handler: ResetSurveyHandler,
    pub submit_response_handler: SubmitResponseHandler,
    pub import_surveys_handler: ImportSurveysHandler,
    pub login_handler: LoginHandler,
    pub logout_handler: LogoutHandler,

    // ========== Query Handlers ==========
    pub list_surveys_handler: ListSurveysHandler,
    pub get_survey_handler: GetSurveyHandler,
    pub get_survey_results_handler: GetSurveyResultsHandler,
    pub export_surveys_handler: ExportSurveysHandler,

    // ========== HTTP ==========
    pub cookie_key: Key,
    pub session: SessionSettings,
    pub kiosk: KioskConfig,
    pub rate_limiter: Option<Arc<FixedWindowRateLimiter>>,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        config: &AppConfig,
        survey_repo: Arc<dyn SurveyRepositoryPort>,
        response_repo: Arc<dyn ResponseRepositoryPort>,
        image_storage: Arc<dyn ImageStoragePort>,
        image_processor: Arc<dyn ImageProcessorPort>,
        session_manager: Arc<dyn SessionManagerPort>,
    ) -> Self {
        let rate_limiter = config.rate_limit.enabled.then(|| {
            Arc::new(FixedWindowRateLimiter::new(
                config.rate_limit.max_requests,
                Duration::from_secs(config.rate_limit.window_secs),
            ))
        });

        Self {
            // Ports
            session_manager: session_manager.clone(),

            // Command handlers
            create_survey_handler: CreateSurveyHandler::new(
                survey_repo.clone(),
                image_storage.clone(),
                image_processor.clone(),
            ),
            update_survey_handler: UpdateSurveyHandler::new(
                survey_repo.clone(),
                image_storage.clone(),
                image_processor.clone(),
            ),
            delete_survey_handler: DeleteSurveyHandler::new(survey_repo.clone(), image_storage.clone()),
            duplicate_survey_handler: DuplicateSurveyHandler::new(
                survey_repo.clone(),
                image_storage.clone(),
            ),
            reset_survey_handler: ResetSurveyHandler::new(survey_repo.clone(), response_repo.clone()),
            submit_response_handler: SubmitResponseHandler::new(
                survey_repo.clone(),
                response_repo.clone(),
            ),
            import_surveys_handler: ImportSurveysHandler::new(
                survey_repo.clone(),
                image_storage.clone(),
                image_processor,
            ),
            login_handler: LoginHandler::new(
                session_manager.clone(),
                config.admin.password.clone(),
                config.admin.session_ttl_secs,
            ),
            logout_handler: LogoutHandler::new(session_manager),

            // Query handlers
            list_surveys_handler: ListSurveysHandler::new(survey_repo.clone()),
            get_survey_handler: GetSurveyHandler::new(survey_repo.clone()),
            get_survey_results_handler: GetSurveyResultsHandler::new(
                survey_repo.clone(),
                response_repo,
            ),
            export_surveys_handler: ExportSurveysHandler::new(survey_repo, image_storage),

            // HTTP
            cookie_key: derive_cookie_key(&config.admin.session_secret),
            session: SessionSettings {
                cookie_name: SESSION_COOKIE,
                secure: config.server.production,
                ttl_secs: config.admin.session_ttl_secs,
            },
            kiosk: config.kiosk.clone(),
            rate_limiter,
        }
    }
}

/// 由任意长度的密钥派生 64 字节签名密钥
pub fn derive_cookie_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// 签名 Cookie 的密钥提取类型（本地新类型，满足孤儿规则）
#[derive(Clone)]
pub struct CookieKey(pub Key);

impl From<CookieKey> for Key {
    fn from(key: CookieKey) -> Self {
        key.0
    }
}

impl FromRef<Arc<AppState>> for CookieKey {
    fn from_ref(state: &Arc<AppState>) -> Self {
        CookieKey(state.cookie_key.clone())
    }
}
