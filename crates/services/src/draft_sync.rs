use std::collections::BTreeMap;
use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use sdg_core::model::{Assessment, AssessmentId, FieldValue, GoalId, ProjectId, Section};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DraftSyncError;

#[derive(Clone, Debug)]
pub struct DraftSyncConfig {
    pub base_url: String,
    pub csrf_token: String,
}

impl DraftSyncConfig {
    /// Reads `SDG_SERVER_URL` and `SDG_CSRF_TOKEN`. No URL means no sync.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("SDG_SERVER_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        let csrf_token = env::var("SDG_CSRF_TOKEN").unwrap_or_default();
        Some(Self {
            base_url,
            csrf_token,
        })
    }
}

/// One section's answers as sent to the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionDraft {
    pub project_id: ProjectId,
    pub section_id: GoalId,
    pub section_data: SectionData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionData {
    pub inputs: BTreeMap<String, FieldValue>,
    pub notes: String,
}

impl SectionData {
    #[must_use]
    pub fn of(section: &Section) -> Self {
        Self {
            inputs: section.inputs().clone(),
            notes: section.notes().to_string(),
        }
    }
}

impl SectionDraft {
    #[must_use]
    pub fn new(project_id: ProjectId, section_id: GoalId, section: &Section) -> Self {
        Self {
            project_id,
            section_id,
            section_data: SectionData::of(section),
        }
    }
}

/// Every section of a submitted assessment, keyed by goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullSnapshot {
    pub project_id: ProjectId,
    pub assessment_id: Option<AssessmentId>,
    pub action: &'static str,
    pub assessment_data: BTreeMap<GoalId, SectionData>,
}

impl FullSnapshot {
    #[must_use]
    pub fn of(assessment: &Assessment) -> Self {
        Self {
            project_id: assessment.project_id(),
            assessment_id: assessment.assessment_id(),
            action: "submit",
            assessment_data: assessment
                .sections()
                .map(|(goal, section)| (goal, SectionData::of(section)))
                .collect(),
        }
    }
}

/// Server acknowledgement of a saved section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DraftAck {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Server reply to a submitted assessment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmitAck {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
}

/// Pushes section drafts and finished assessments to a remote server.
#[async_trait]
pub trait DraftSync: Send + Sync {
    fn enabled(&self) -> bool;

    /// Sends one section. Failures are reported, never retried.
    async fn push_section(&self, draft: &SectionDraft) -> Result<DraftAck, DraftSyncError>;

    /// Sends the whole assessment once it is submitted locally.
    async fn submit_assessment(&self, snapshot: &FullSnapshot) -> Result<SubmitAck, DraftSyncError>;
}

/// Used when no server is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledDraftSync;

#[async_trait]
impl DraftSync for DisabledDraftSync {
    fn enabled(&self) -> bool {
        false
    }

    async fn push_section(&self, _draft: &SectionDraft) -> Result<DraftAck, DraftSyncError> {
        Err(DraftSyncError::Disabled)
    }

    async fn submit_assessment(&self, _snapshot: &FullSnapshot) -> Result<SubmitAck, DraftSyncError> {
        Err(DraftSyncError::Disabled)
    }
}

/// `POST {base}/api/save-progress` and `POST {base}/api/submit-assessment`,
/// both with the CSRF token in a header.
#[derive(Clone)]
pub struct HttpDraftSync {
    client: Client,
    config: DraftSyncConfig,
}

impl HttpDraftSync {
    #[must_use]
    pub fn new(config: DraftSyncConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &DraftSyncConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<reqwest::Response, DraftSyncError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .header("X-CSRFToken", &self.config.csrf_token)
            .header("X-Requested-With", "XMLHttpRequest")
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DraftSyncError::HttpStatus(response.status()));
        }
        Ok(response)
    }
}

#[async_trait]
impl DraftSync for HttpDraftSync {
    fn enabled(&self) -> bool {
        true
    }

    async fn push_section(&self, draft: &SectionDraft) -> Result<DraftAck, DraftSyncError> {
        let payload = CsrfRequest {
            body: draft,
            csrf_token: &self.config.csrf_token,
        };
        let response = self.post("/api/save-progress", &payload).await?;

        let ack: DraftAck = response.json().await?;
        if ack.status != "success" {
            return Err(DraftSyncError::Rejected(
                ack.message.unwrap_or(ack.status),
            ));
        }
        debug!(section = %draft.section_id, "section pushed to server");
        Ok(ack)
    }

    async fn submit_assessment(&self, snapshot: &FullSnapshot) -> Result<SubmitAck, DraftSyncError> {
        let payload = CsrfRequest {
            body: snapshot,
            csrf_token: &self.config.csrf_token,
        };
        let response = self.post("/api/submit-assessment", &payload).await?;

        let ack: SubmitAck = response.json().await?;
        if !ack.success {
            return Err(DraftSyncError::Rejected(
                ack.message.unwrap_or_else(|| "submission rejected".into()),
            ));
        }
        debug!(
            project = %snapshot.project_id,
            sections = snapshot.assessment_data.len(),
            "assessment submitted to server"
        );
        Ok(ack)
    }
}

/// Builds the configured sync, or the disabled one.
#[must_use]
pub fn draft_sync_from_env() -> Arc<dyn DraftSync> {
    match DraftSyncConfig::from_env() {
        Some(config) => Arc::new(HttpDraftSync::new(config)),
        None => Arc::new(DisabledDraftSync),
    }
}

#[derive(Debug, Serialize)]
struct CsrfRequest<'a, T> {
    #[serde(flatten)]
    body: &'a T,
    csrf_token: &'a str,
}
