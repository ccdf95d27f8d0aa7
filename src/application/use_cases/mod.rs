pub mod generate_report;
pub mod load_survey;
