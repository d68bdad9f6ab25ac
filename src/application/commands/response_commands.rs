//! Response Commands - 答卷提交

use crate::domain::response::Answers;
use crate::domain::survey::SurveyId;

/// 提交答卷命令
#[derive(Debug, Clone)]
pub struct SubmitResponse {
    pub survey_id: SurveyId,
    pub answers: Answers,
}
