use std::path::PathBuf;

const ENV_DATABASE_PATH: &str = "STABILITY_DB_PATH";
const ENV_SURVEY_CSV_PATH: &str = "SURVEY_CSV_PATH";
const ENV_REPORT_OUTPUT_DIR: &str = "REPORT_OUTPUT_DIR";

const DEFAULT_DATABASE_PATH: &str = "stability_app.db";
const DEFAULT_SURVEY_CSV_PATH: &str = "data/survey_responses_rows.csv";

/// Runtime settings for both batch jobs, read from the environment with
/// working-directory defaults matching the original deployment layout.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_path: PathBuf,
    pub survey_csv_path: PathBuf,
    pub report_output_dir: PathBuf,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            database_path: env_path(ENV_DATABASE_PATH, DEFAULT_DATABASE_PATH),
            survey_csv_path: env_path(ENV_SURVEY_CSV_PATH, DEFAULT_SURVEY_CSV_PATH),
            report_output_dir: env_path(ENV_REPORT_OUTPUT_DIR, "."),
        }
    }
}

fn env_path(key: &str, default: &str) -> PathBuf {
    match std::env::var(key) {
        Ok(val) if !val.trim().is_empty() => PathBuf::from(val),
        _ => PathBuf::from(default),
    }
}
