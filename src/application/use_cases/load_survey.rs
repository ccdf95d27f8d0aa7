// ============================================================
// SURVEY LOADER USE CASE
// ============================================================
// Orchestrate CSV reading, lookup resolution, and batch insertion

use std::path::Path;

use chrono::NaiveDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::error::{AppError, Result};
use crate::domain::lookups::LookupCache;
use crate::domain::submission::{NewSubmission, SurveyRecord, REPORT_STATUS_COMPLETED};
use crate::infrastructure::csv::read_survey_csv;
use crate::infrastructure::db::repository::{InsertOutcome, SurveyRepository};

const PROGRESS_INTERVAL: usize = 50;

/// Counters reported after a successful load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub rows_read: usize,
    pub submissions_loaded: usize,
    pub scores_loaded: usize,
    pub report_requests_created: usize,
    pub skipped_invalid_id: usize,
    pub skipped_duplicates: usize,
}

/// Loader pipeline: CSV rows into Submissions, SubmissionScores and
/// ReportRequests, all inside one transaction committed at the end.
pub struct LoadSurveyUseCase {
    repo: SurveyRepository,
}

impl LoadSurveyUseCase {
    pub fn new(repo: SurveyRepository) -> Self {
        Self { repo }
    }

    /// Load every row of the CSV at `csv_path`.
    ///
    /// Rows with an unparseable UUID are skipped silently; rows whose ID
    /// already exists in the store are skipped in full (no scores, no report
    /// request). Any other failure rolls back the entire batch.
    pub async fn run(&self, csv_path: &Path) -> Result<LoadSummary> {
        info!("Reading CSV file...");
        let records = read_survey_csv(csv_path)?;
        info!(rows = records.len(), "Found records in CSV");

        info!("Loading lookup tables...");
        let cache = self.repo.load_lookup_cache().await?;
        debug!(
            age_ranges = cache.age_range_count(),
            regions = cache.region_count(),
            indicators = cache.indicator_count(),
            "Lookup cache ready"
        );

        let mut summary = LoadSummary {
            rows_read: records.len(),
            ..Default::default()
        };

        info!("Processing submissions...");
        // One transaction covers the whole batch; dropping it on an early
        // error return rolls back everything written so far.
        let mut tx = self.repo.begin().await?;

        for (index, record) in records.iter().enumerate() {
            if index % PROGRESS_INTERVAL == 0 {
                info!(processed = index, "Processing records...");
            }

            let submission = match map_record(record, &cache)? {
                Some(submission) => submission,
                None => {
                    summary.skipped_invalid_id += 1;
                    continue;
                }
            };

            match self.repo.insert_submission(&mut tx, &submission).await? {
                InsertOutcome::Inserted => summary.submissions_loaded += 1,
                InsertOutcome::AlreadyExists => {
                    summary.skipped_duplicates += 1;
                    continue;
                }
            }

            for (label, rate) in record.indicator_rates() {
                let Some(rate) = rate else {
                    continue;
                };
                // Indicators are assumed fully populated; an unmapped label
                // here is fatal, unlike the lenient age-range/region handling.
                let indicator_id = cache.indicator_id(label).ok_or_else(|| {
                    AppError::NotFound(format!(
                        "Indicator not present in lookup table: {}",
                        label
                    ))
                })?;
                self.repo
                    .insert_score(&mut tx, submission.submission_id, indicator_id, rate as i64)
                    .await?;
                summary.scores_loaded += 1;
            }

            if record.contact_email().is_some() {
                self.repo
                    .insert_report_request(
                        &mut tx,
                        submission.submission_id,
                        REPORT_STATUS_COMPLETED,
                    )
                    .await?;
                summary.report_requests_created += 1;
            }
        }

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to commit batch: {}", e)))?;

        info!(
            submissions = summary.submissions_loaded,
            scores = summary.scores_loaded,
            report_requests = summary.report_requests_created,
            invalid_ids = summary.skipped_invalid_id,
            duplicates = summary.skipped_duplicates,
            "Data loading completed"
        );
        Ok(summary)
    }
}

/// Map a CSV record to an insertable submission.
///
/// Returns `Ok(None)` for rows with an unparseable ID (silent-skip policy).
/// A malformed timestamp is an error: unlike a bad ID it indicates a broken
/// export, so the run aborts.
fn map_record(record: &SurveyRecord, cache: &LookupCache) -> Result<Option<NewSubmission>> {
    let submission_id = match Uuid::parse_str(record.id.trim()) {
        Ok(id) => id,
        Err(_) => {
            debug!(id = %record.id, "Skipping row with invalid submission ID");
            return Ok(None);
        }
    };

    let created_at = parse_naive_timestamp(&record.created_at)?;

    Ok(Some(NewSubmission {
        submission_id,
        created_at,
        age_range_id: cache.age_range_id(record.age_range.as_deref()),
        region_id: cache.region_id(record.region.as_deref()),
        instability_ratio: record.ratio(),
        first_name: record.first_name.clone(),
        last_name: record.last_name.clone(),
        email: record.email.clone(),
    }))
}

/// Parse an ISO-8601 timestamp, stripping a literal trailing UTC offset.
/// The export appends `+00:00` to every timestamp; the store keeps naive
/// datetimes.
fn parse_naive_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let trimmed = raw.trim().trim_end_matches("+00:00");
    trimmed.parse::<NaiveDateTime>().map_err(|e| {
        AppError::ParseError(format!("Invalid created_at timestamp {:?}: {}", raw, e))
    })
}
