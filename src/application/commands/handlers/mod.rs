//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod auth_handlers;
mod response_handlers;
mod survey_handlers;
mod transfer_handlers;

pub use auth_handlers::*;
pub use response_handlers::*;
pub use survey_handlers::*;
pub use transfer_handlers::*;
