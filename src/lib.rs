//! Survey Kiosk - 双语问卷自助终端后端
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Survey Context: 问卷、问题、选项，旧版 `items` 迁移
//! - Response Context: 答卷（旧版扁平 / 按问题）
//! - Results: 统计计算（纯函数）
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Repositories, ImageStorage, ImageProcessor, SessionManager）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API、Cookie 会话、限流、静态文件
//! - Memory: SessionManager、限流器内存实现
//! - Persistence: JSON 文件存储
//! - Adapters: 图片优化、图片文件存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
