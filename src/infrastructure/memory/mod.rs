//! Memory Layer - In-Memory State Management
//!
//! 实现 SessionManager 与请求限流，状态仅存在于进程内

mod rate_limiter;
mod session_manager;

pub use rate_limiter::{FixedWindowRateLimiter, RateDecision};
pub use session_manager::InMemorySessionManager;
