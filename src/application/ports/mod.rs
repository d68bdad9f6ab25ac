//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod image_processor;
mod image_storage;
mod repositories;
mod session_manager;

pub use image_processor::{ImageError, ImageKind, ImageProcessorPort, ProcessedImage};
pub use image_storage::{ImageStorageError, ImageStoragePort};
pub use repositories::{
    ContentReplaced, RepositoryError, ResponseRepositoryPort, SurveyRepositoryPort,
};
pub use session_manager::{Session, SessionError, SessionManagerPort};
