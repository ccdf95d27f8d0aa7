// ============================================================
// REPORT GENERATION USE CASE
// ============================================================
// Query the latest contactable submission and render its PDF

use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::error::{AppError, Result};
use crate::infrastructure::db::repository::SurveyRepository;
use crate::infrastructure::pdf::render_report;

/// Report pipeline: three reads, then fixed-layout PDF assembly.
pub struct GenerateReportUseCase {
    repo: SurveyRepository,
}

impl GenerateReportUseCase {
    pub fn new(repo: SurveyRepository) -> Self {
        Self { repo }
    }

    /// Generate a PDF for the most recent submission that has an email.
    ///
    /// Returns the written path, or `None` when no eligible submission
    /// exists (the pipeline's one expected no-output case). Consumes the
    /// use case: the pool is released as soon as the reads complete,
    /// before any rendering work.
    pub async fn run(self, output_dir: &Path) -> Result<Option<PathBuf>> {
        info!("Generating PDF report...");

        let Some(submission_id) = self.repo.latest_submission_with_email().await? else {
            info!("No submissions with email found");
            return Ok(None);
        };

        let detail = self
            .repo
            .submission_detail(submission_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Submission {} disappeared between queries",
                    submission_id
                ))
            })?;
        let scores = self.repo.submission_scores(submission_id).await?;

        // Reads are done; rendering is purely local.
        self.repo.close().await;

        let path = render_report(&detail, &scores, output_dir)?;
        info!(path = %path.display(), "PDF report generated");
        Ok(Some(path))
    }
}
