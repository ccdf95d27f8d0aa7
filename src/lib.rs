pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{GenerateReportUseCase, LoadSurveyUseCase};
pub use domain::error::{AppError, Result};
