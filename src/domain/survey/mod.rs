//! Survey Context - 问卷限界上下文
//!
//! 职责:
//! - 问卷聚合（双语标题、封面、问题列表）
//! - 问题 / 选项实体
//! - 旧版 `items` 格式迁移
//! - 图片文件命名规则

mod aggregate;
mod entities;
mod errors;
mod value_objects;

pub use aggregate::{legacy_question, validate_questions, ImageCopy, Survey, SurveyContent};
pub use entities::{Item, Question};
pub(crate) use entities::{id_list, id_string};
pub use errors::SurveyError;
pub use value_objects::{image_name, validate_element_id, SelectionMode, SurveyId, LEGACY_QUESTION_ID};
