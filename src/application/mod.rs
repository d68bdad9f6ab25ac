//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Repository、ImageStorage、ImageProcessor、SessionManager）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - bundle: 导出 / 导入包格式
//! - error: 应用层错误定义

pub mod bundle;
pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Survey commands
    CreateSurvey,
    DeleteSurvey,
    DuplicateSurvey,
    ImageInput,
    ItemDraft,
    QuestionDraft,
    ResetSurvey,
    SurveyDraft,
    UpdateSurvey,
    // Response commands
    SubmitResponse,
    // Auth commands
    LoginCommand,
    LoginResponse,
    LogoutCommand,
    // Transfer commands
    ImportSurveys,
    // Handlers
    handlers::{
        CreateSurveyHandler, DeleteSurveyHandler, DuplicateSurveyHandler, ImportResult,
        ImportSurveysHandler, LoginHandler, LogoutHandler, ResetSurveyHandler,
        SubmitResponseHandler, UpdateSurveyHandler,
    },
};

pub use bundle::{BundledSurvey, SurveyBundle, BUNDLE_VERSION};

pub use error::ApplicationError;

pub use ports::{
    // Image processing
    ImageError,
    ImageKind,
    ImageProcessorPort,
    ProcessedImage,
    // Image storage
    ImageStorageError,
    ImageStoragePort,
    // Repositories
    RepositoryError,
    ResponseRepositoryPort,
    SurveyRepositoryPort,
    // Session manager
    Session,
    SessionError,
    SessionManagerPort,
};

pub use queries::{
    ExportSurveys,
    GetSurvey,
    GetSurveyResults,
    ListSurveys,
    // Handlers
    handlers::{
        ExportSurveysHandler, GetSurveyHandler, GetSurveyResultsHandler, ListSurveysHandler,
        SurveyResults,
    },
};
