//! Response Context - Entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::survey::{id_list, id_string, SelectionMode, Survey, SurveyError, SurveyId};
use crate::domain::timestamp;

/// 一次提交的答卷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub survey_id: SurveyId,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub answers: Answers,
}

/// 答卷内容：旧版扁平列表，或按问题分组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answers {
    Questions { responses: Vec<QuestionAnswer> },
    Legacy {
        #[serde(deserialize_with = "id_list")]
        selected_items: Vec<String>,
    },
}

/// 单个问题的选择
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    #[serde(deserialize_with = "id_string")]
    pub question_id: String,
    #[serde(default, deserialize_with = "id_list")]
    pub selected_items: Vec<String>,
}

impl Response {
    pub fn new(survey_id: SurveyId, answers: Answers, timestamp: DateTime<Utc>) -> Self {
        Self {
            survey_id,
            timestamp,
            answers,
        }
    }

    /// 是否选中了某问题下的某选项
    ///
    /// 旧版答卷没有问题维度，只要列表里出现该选项 ID 就算选中。
    pub fn selects(&self, question_id: &str, item_id: &str) -> bool {
        match &self.answers {
            Answers::Legacy { selected_items } => selected_items.iter().any(|id| id == item_id),
            Answers::Questions { responses } => responses
                .iter()
                .filter(|a| a.question_id == question_id)
                .any(|a| a.selected_items.iter().any(|id| id == item_id)),
        }
    }

    /// 选择总数（用于平均选择数）
    pub fn selection_count(&self) -> usize {
        match &self.answers {
            Answers::Legacy { selected_items } => selected_items.len(),
            Answers::Questions { responses } => {
                responses.iter().map(|a| a.selected_items.len()).sum()
            }
        }
    }
}

impl Answers {
    /// 按问卷结构校验答卷
    ///
    /// 旧版扁平列表不做结构校验；分组格式要求问题存在，单选题最多一个选项。
    pub fn check_against(&self, survey: &Survey) -> Result<(), SurveyError> {
        let Answers::Questions { responses } = self else {
            return Ok(());
        };

        for answer in responses {
            let question = survey
                .find_question(&answer.question_id)
                .ok_or_else(|| SurveyError::UnknownQuestion(answer.question_id.clone()))?;
            if question.selection_mode == SelectionMode::Single && answer.selected_items.len() > 1 {
                return Err(SurveyError::TooManySelections(question.id.clone()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::survey::{Item, Question, SurveyContent};
    use serde_json::json;

    #[test]
    fn test_legacy_shape_roundtrips_as_written() {
        let raw = json!({
            "survey_id": "1",
            "selected_items": ["1", "3"],
            "timestamp": "2025-01-01T10:00:00.000Z"
        });
        let response: Response = serde_json::from_value(raw.clone()).unwrap();
        assert!(matches!(response.answers, Answers::Legacy { .. }));
        assert_eq!(serde_json::to_value(&response).unwrap(), raw);
    }

    #[test]
    fn test_question_shape() {
        let response: Response = serde_json::from_value(json!({
            "survey_id": "2",
            "timestamp": "2025-01-01T10:00:00.000Z",
            "responses": [
                {"question_id": "q1", "selected_items": ["a"]},
                {"question_id": "q2", "selected_items": ["a", "b"]}
            ]
        }))
        .unwrap();

        assert!(response.selects("q1", "a"));
        assert!(!response.selects("q1", "b"));
        assert!(response.selects("q2", "b"));
        assert_eq!(response.selection_count(), 3);
    }

    #[test]
    fn test_legacy_selects_any_question() {
        let response = Response::new(
            SurveyId::from("1"),
            Answers::Legacy { selected_items: vec!["2".into()] },
            Utc::now(),
        );
        assert!(response.selects("q1", "2"));
        assert!(response.selects("q9", "2"));
        assert!(!response.selects("q1", "1"));
    }

    #[test]
    fn test_check_against_survey() {
        let survey = Survey::new(
            SurveyId::from("1"),
            SurveyContent {
                questions: vec![Question {
                    id: "q1".into(),
                    text_en: String::new(),
                    text_sv: String::new(),
                    selection_mode: SelectionMode::Single,
                    items: vec![Item::new("1", "", ""), Item::new("2", "", "")],
                }],
                ..Default::default()
            },
            Utc::now(),
        );

        let ok = Answers::Questions {
            responses: vec![QuestionAnswer { question_id: "q1".into(), selected_items: vec!["1".into()] }],
        };
        assert!(ok.check_against(&survey).is_ok());

        let too_many = Answers::Questions {
            responses: vec![QuestionAnswer {
                question_id: "q1".into(),
                selected_items: vec!["1".into(), "2".into()],
            }],
        };
        assert!(matches!(too_many.check_against(&survey), Err(SurveyError::TooManySelections(_))));

        let unknown = Answers::Questions {
            responses: vec![QuestionAnswer { question_id: "q7".into(), selected_items: vec![] }],
        };
        assert!(matches!(unknown.check_against(&survey), Err(SurveyError::UnknownQuestion(_))));

        let legacy = Answers::Legacy { selected_items: vec!["1".into(), "2".into()] };
        assert!(legacy.check_against(&survey).is_ok());
    }
}
