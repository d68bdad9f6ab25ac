//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod auth_commands;
mod response_commands;
mod survey_commands;
mod transfer_commands;

pub mod handlers;

pub use auth_commands::*;
pub use response_commands::*;
pub use survey_commands::*;
pub use transfer_commands::*;
