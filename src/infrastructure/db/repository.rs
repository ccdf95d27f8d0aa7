use std::collections::HashMap;

use sqlx::sqlite::SqlitePool;
use sqlx::{Sqlite, SqliteConnection, Transaction};
use uuid::Uuid;

use crate::domain::error::{AppError, Result};
use crate::domain::lookups::LookupCache;
use crate::domain::submission::{IndicatorScore, NewSubmission, SubmissionDetail};

/// Result of a conflict-aware submission insert. Duplicate IDs are an
/// expected condition the caller inspects, not an error to catch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

pub struct SurveyRepository {
    pool: SqlitePool,
}

impl SurveyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Release all connections. The report pipeline calls this once its
    /// reads complete, before any rendering work starts.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to begin transaction: {}", e)))
    }

    /// Load the three lookup tables into an in-memory cache. Tables are small
    /// by assumption; no pagination. Any query error aborts the run.
    pub async fn load_lookup_cache(&self) -> Result<LookupCache> {
        let age_ranges = self
            .fetch_lookup("SELECT age_range_label, age_range_id FROM AgeRanges")
            .await?;
        let regions = self
            .fetch_lookup("SELECT region_name, region_id FROM Regions")
            .await?;
        let indicators = self
            .fetch_lookup("SELECT indicator_name, indicator_id FROM Indicators")
            .await?;

        Ok(LookupCache::new(age_ranges, regions, indicators))
    }

    async fn fetch_lookup(&self, sql: &str) -> Result<HashMap<String, i64>> {
        let rows = sqlx::query_as::<_, (String, i64)>(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to load lookup table: {}", e)))?;
        Ok(rows.into_iter().collect())
    }

    /// Insert a submission inside the caller's transaction. A uniqueness
    /// violation on the ID reports `AlreadyExists`; any other failure is an
    /// error the caller treats as fatal to the run.
    pub async fn insert_submission(
        &self,
        conn: &mut SqliteConnection,
        submission: &NewSubmission,
    ) -> Result<InsertOutcome> {
        let result = sqlx::query(
            "INSERT INTO Submissions (submission_id, created_at, age_range_id, region_id,
                                      instability_ratio, first_name, last_name, email)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(submission.submission_id.to_string())
        .bind(submission.created_at)
        .bind(submission.age_range_id)
        .bind(submission.region_id)
        .bind(submission.instability_ratio)
        .bind(&submission.first_name)
        .bind(&submission.last_name)
        .bind(&submission.email)
        .execute(&mut *conn)
        .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Ok(InsertOutcome::AlreadyExists)
            }
            Err(e) => Err(AppError::DatabaseError(format!(
                "Failed to insert submission: {}",
                e
            ))),
        }
    }

    pub async fn insert_score(
        &self,
        conn: &mut SqliteConnection,
        submission_id: Uuid,
        indicator_id: i64,
        score_value: i64,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO SubmissionScores (submission_id, indicator_id, score_value)
             VALUES (?, ?, ?)",
        )
        .bind(submission_id.to_string())
        .bind(indicator_id)
        .bind(score_value)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to insert score: {}", e)))?;
        Ok(())
    }

    pub async fn insert_report_request(
        &self,
        conn: &mut SqliteConnection,
        submission_id: Uuid,
        status: &str,
    ) -> Result<()> {
        sqlx::query("INSERT INTO ReportRequests (submission_id, status) VALUES (?, ?)")
            .bind(submission_id.to_string())
            .bind(status)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to insert report request: {}", e))
            })?;
        Ok(())
    }

    /// Most recently created submission that carries an email, if any.
    pub async fn latest_submission_with_email(&self) -> Result<Option<Uuid>> {
        let id: Option<String> = sqlx::query_scalar(
            "SELECT submission_id FROM Submissions
             WHERE email IS NOT NULL
             ORDER BY created_at DESC
             LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to query submissions: {}", e)))?;

        id.map(|raw| parse_stored_uuid(&raw)).transpose()
    }

    /// Submission detail joined to lookup labels. LEFT JOINs keep rows with
    /// missing lookups; their labels stay `None` for the renderer.
    pub async fn submission_detail(&self, submission_id: Uuid) -> Result<Option<SubmissionDetail>> {
        #[derive(sqlx::FromRow)]
        struct SubmissionEntity {
            submission_id: String,
            created_at: chrono::NaiveDateTime,
            instability_ratio: Option<f64>,
            first_name: Option<String>,
            last_name: Option<String>,
            email: Option<String>,
            age_range_label: Option<String>,
            region_name: Option<String>,
        }

        let entity = sqlx::query_as::<_, SubmissionEntity>(
            "SELECT s.submission_id, s.created_at, s.instability_ratio,
                    s.first_name, s.last_name, s.email,
                    ar.age_range_label, r.region_name
             FROM Submissions s
             LEFT JOIN AgeRanges ar ON s.age_range_id = ar.age_range_id
             LEFT JOIN Regions r ON s.region_id = r.region_id
             WHERE s.submission_id = ?",
        )
        .bind(submission_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(format!("Failed to query submission detail: {}", e))
        })?;

        entity
            .map(|e| {
                Ok(SubmissionDetail {
                    submission_id: parse_stored_uuid(&e.submission_id)?,
                    created_at: e.created_at,
                    instability_ratio: e.instability_ratio,
                    first_name: e.first_name,
                    last_name: e.last_name,
                    email: e.email,
                    age_range_label: e.age_range_label,
                    region_name: e.region_name,
                })
            })
            .transpose()
    }

    /// All indicator scores for a submission, joined to indicator labels.
    pub async fn submission_scores(&self, submission_id: Uuid) -> Result<Vec<IndicatorScore>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT i.indicator_name, ss.score_value
             FROM SubmissionScores ss
             JOIN Indicators i ON ss.indicator_id = i.indicator_id
             WHERE ss.submission_id = ?",
        )
        .bind(submission_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to query scores: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|(indicator_name, score_value)| IndicatorScore {
                indicator_name,
                score_value,
            })
            .collect())
    }
}

fn parse_stored_uuid(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|e| AppError::DatabaseError(format!("Stored submission ID is not a UUID: {}", e)))
}
