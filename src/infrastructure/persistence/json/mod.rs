//! JSON 文件持久化

mod response_repo;
mod store;
mod survey_repo;

pub use response_repo::JsonResponseRepository;
pub use store::JsonFileStore;
pub use survey_repo::JsonSurveyRepository;
