//! Survey Queries

use crate::domain::survey::SurveyId;

/// 列出全部问卷
#[derive(Debug, Clone, Default)]
pub struct ListSurveys;

/// 获取单个问卷
#[derive(Debug, Clone)]
pub struct GetSurvey {
    pub survey_id: SurveyId,
}

/// 获取问卷统计结果
#[derive(Debug, Clone)]
pub struct GetSurveyResults {
    pub survey_id: SurveyId,
}

/// 导出全部问卷（含图片）
#[derive(Debug, Clone, Default)]
pub struct ExportSurveys;
