pub mod use_cases;

pub use use_cases::generate_report::GenerateReportUseCase;
pub use use_cases::load_survey::{LoadSummary, LoadSurveyUseCase};
