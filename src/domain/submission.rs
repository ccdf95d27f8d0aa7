// ============================================================
// SUBMISSION TYPES
// ============================================================
// Data structures shared by the loader and report pipelines

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status written to ReportRequests by the loader. No generation step runs
/// here; the sentinel tells downstream processes the report already exists.
pub const REPORT_STATUS_COMPLETED: &str = "completed";

/// CSV rate column -> indicator label as stored in the Indicators lookup table.
pub const INDICATOR_COLUMNS: [(&str, &str); 5] = [
    ("economic_management_rate", "Economic Management"),
    ("immigration_policy_rate", "Immigration Policy"),
    ("foreign_policy_rate", "Foreign Policy"),
    ("domestic_policy_rate", "Domestic Policy"),
    ("social_policy_rate", "Social Policy"),
];

/// One row of the survey CSV export, as deserialized by the CSV reader.
/// Empty cells map to `None`; no validation happens at this stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyRecord {
    pub id: String,
    pub created_at: String,
    pub age_range: Option<String>,
    pub region: Option<String>,
    pub instability_ratio: Option<f64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub economic_management_rate: Option<f64>,
    pub immigration_policy_rate: Option<f64>,
    pub foreign_policy_rate: Option<f64>,
    pub domestic_policy_rate: Option<f64>,
    pub social_policy_rate: Option<f64>,
}

impl SurveyRecord {
    /// Rate values in the fixed indicator-column order of `INDICATOR_COLUMNS`.
    /// Non-finite cells (a literal `NaN` in the export) count as absent.
    pub fn indicator_rates(&self) -> [(&'static str, Option<f64>); 5] {
        [
            (INDICATOR_COLUMNS[0].1, finite(self.economic_management_rate)),
            (INDICATOR_COLUMNS[1].1, finite(self.immigration_policy_rate)),
            (INDICATOR_COLUMNS[2].1, finite(self.foreign_policy_rate)),
            (INDICATOR_COLUMNS[3].1, finite(self.domestic_policy_rate)),
            (INDICATOR_COLUMNS[4].1, finite(self.social_policy_rate)),
        ]
    }

    /// Instability ratio with non-finite cells treated as absent.
    pub fn ratio(&self) -> Option<f64> {
        finite(self.instability_ratio)
    }

    /// Email with surrounding whitespace removed, `None` when absent or blank.
    pub fn contact_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// A validated, lookup-resolved submission ready for insertion.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub submission_id: Uuid,
    pub created_at: NaiveDateTime,
    pub age_range_id: Option<i64>,
    pub region_id: Option<i64>,
    pub instability_ratio: Option<f64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Submission row joined to its lookup labels, as read by the report pipeline.
/// Labels stay optional; the renderer substitutes a placeholder for `None`.
#[derive(Debug, Clone)]
pub struct SubmissionDetail {
    pub submission_id: Uuid,
    pub created_at: NaiveDateTime,
    pub instability_ratio: Option<f64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub age_range_label: Option<String>,
    pub region_name: Option<String>,
}

/// One indicator score joined to its indicator label.
#[derive(Debug, Clone)]
pub struct IndicatorScore {
    pub indicator_name: String,
    pub score_value: i64,
}
