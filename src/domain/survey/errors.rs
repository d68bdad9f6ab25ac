//! Survey Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Survey must contain at least one question")]
    NoQuestions,

    #[error("Question {0} must contain at least one item")]
    EmptyQuestion(String),

    #[error("Duplicate question id: {0}")]
    DuplicateQuestion(String),

    #[error("Duplicate item id {item} in question {question}")]
    DuplicateItem { question: String, item: String },

    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    #[error("Question {0} accepts a single selection")]
    TooManySelections(String),
}
