// ============================================================
// SURVEY CSV READER
// ============================================================
// Read the survey-response export into typed records

use std::path::Path;

use csv::{ReaderBuilder, Trim};

use crate::domain::error::AppError;
use crate::domain::submission::SurveyRecord;

/// Read all rows of a survey CSV export.
///
/// Fields are trimmed and empty cells deserialize to `None`. A missing file
/// or a structurally broken row is an error; semantic validation (UUID,
/// timestamp) is left to the row mapper.
pub fn read_survey_csv(path: &Path) -> Result<Vec<SurveyRecord>, AppError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| AppError::IoError(format!("Failed to open CSV file: {}", e)))?;

    let mut records = Vec::new();
    for (index, result) in reader.deserialize::<SurveyRecord>().enumerate() {
        let record = result.map_err(|e| {
            AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
        })?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "id,created_at,age_range,region,instability_ratio,first_name,last_name,email,economic_management_rate,immigration_policy_rate,foreign_policy_rate,domestic_policy_rate,social_policy_rate";

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn reads_populated_row() {
        let csv = format!(
            "{}\n3fa85f64-5717-4562-b3fc-2c963f66afa6,2024-01-15T10:00:00+00:00,25-34,Gauteng,0.42,Jane,Doe,a@b.com,3,4,2,5,1\n",
            HEADER
        );
        let file = write_csv(&csv);

        let records = read_survey_csv(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.id, "3fa85f64-5717-4562-b3fc-2c963f66afa6");
        assert_eq!(rec.age_range.as_deref(), Some("25-34"));
        assert_eq!(rec.instability_ratio, Some(0.42));
        assert_eq!(rec.economic_management_rate, Some(3.0));
        assert_eq!(rec.social_policy_rate, Some(1.0));
    }

    #[test]
    fn empty_cells_become_none() {
        let csv = format!(
            "{}\nnot-a-uuid,2024-01-15T10:00:00,,,,,,  ,,,,,\n",
            HEADER
        );
        let file = write_csv(&csv);

        let records = read_survey_csv(file.path()).unwrap();
        let rec = &records[0];
        assert_eq!(rec.age_range, None);
        assert_eq!(rec.region, None);
        assert_eq!(rec.instability_ratio, None);
        assert_eq!(rec.first_name, None);
        // Whitespace-only email trims away entirely.
        assert_eq!(rec.contact_email(), None);
        assert_eq!(rec.economic_management_rate, None);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_survey_csv(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, AppError::IoError(_)));
    }
}
