//! Transfer Commands - 问卷导入

use crate::application::bundle::SurveyBundle;

/// 导入问卷命令
#[derive(Debug, Clone)]
pub struct ImportSurveys {
    pub bundle: SurveyBundle,
}
