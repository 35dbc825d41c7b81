use std::sync::Arc;

use chrono::{DateTime, Utc};
use sdg_core::model::{ProjectId, SubmissionId};
use sdg_core::{PerformanceLevel, ResultsReport, ScoringTable};
use storage::repository::{SubmissionRecord, SubmissionRepository};

use crate::error::ResultsError;

/// A stored submission with its dashboard data.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReport {
    pub id: SubmissionId,
    pub project_id: ProjectId,
    pub submitted_at: DateTime<Utc>,
    pub report: ResultsReport,
}

/// Presentation-agnostic list row for the home screen.
///
/// Timestamps are left unformatted; the UI decides how to show them.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionListItem {
    pub id: SubmissionId,
    pub submitted_at: DateTime<Utc>,
    pub overall: f64,
    pub level: PerformanceLevel,
}

/// Recomputes scores for stored submissions.
#[derive(Clone)]
pub struct ResultsService {
    scoring: Arc<ScoringTable>,
    submissions: Arc<dyn SubmissionRepository>,
}

impl ResultsService {
    #[must_use]
    pub fn new(scoring: Arc<ScoringTable>, submissions: Arc<dyn SubmissionRepository>) -> Self {
        Self {
            scoring,
            submissions,
        }
    }

    /// # Errors
    ///
    /// Returns `ResultsError::NotFound` for an unknown id, or
    /// `ResultsError::Storage` if the repository fails.
    pub async fn report(&self, id: SubmissionId) -> Result<SubmissionReport, ResultsError> {
        let record = self
            .submissions
            .get_submission(id)
            .await?
            .ok_or(ResultsError::NotFound(id))?;
        Ok(self.build(record))
    }

    /// Most recent submissions of a project, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ResultsError::Storage` if the repository fails.
    pub async fn recent(
        &self,
        project: ProjectId,
        limit: u32,
    ) -> Result<Vec<SubmissionListItem>, ResultsError> {
        let records = self.submissions.list_submissions(project, limit).await?;
        Ok(records
            .into_iter()
            .map(|record| {
                let report = self.build(record);
                SubmissionListItem {
                    id: report.id,
                    submitted_at: report.submitted_at,
                    overall: report.report.overall,
                    level: report.report.overall_level(),
                }
            })
            .collect())
    }

    fn build(&self, record: SubmissionRecord) -> SubmissionReport {
        let entries = self.scoring.score_assessment(&record.assessment);
        SubmissionReport {
            id: record.id,
            project_id: record.project_id,
            submitted_at: record.submitted_at,
            report: ResultsReport::from_scores(entries),
        }
    }
}
