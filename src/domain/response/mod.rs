//! Response Context - 答卷限界上下文
//!
//! 答卷以追加方式写入扁平日志，保留提交时的原始形状。

mod entities;

pub use entities::{Answers, QuestionAnswer, Response};
