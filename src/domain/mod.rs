//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Survey Context: 问卷管理
//! - Response Context: 答卷收集
//!
//! 以及基于两者的结果统计。

pub mod response;
pub mod results;
pub mod survey;
pub mod timestamp;

pub use results::{compute as compute_results, ItemStat, QuestionStats, SurveyStats};
