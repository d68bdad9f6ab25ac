//! Query Handlers 实现

mod survey_handlers;

pub use survey_handlers::*;
