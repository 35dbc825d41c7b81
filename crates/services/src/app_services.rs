use std::sync::Arc;

use sdg_core::model::ProjectId;
use storage::repository::Storage;

use crate::Clock;
use crate::assessment::AssessmentService;
use crate::autosave::Autosaver;
use crate::config::AssessmentConfig;
use crate::draft_sync::{DraftSync, draft_sync_from_env};
use crate::drafts::DraftService;
use crate::error::AppServicesError;
use crate::results_service::ResultsService;

/// Assembles app-facing services around one storage backend.
#[derive(Clone)]
pub struct AppServices {
    project_id: ProjectId,
    assessments: Arc<AssessmentService>,
    results: Arc<ResultsService>,
    drafts: Arc<DraftService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage, syncing drafts to the
    /// server named in the environment when there is one.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        project_id: ProjectId,
        config: &AssessmentConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(
            &storage,
            clock,
            project_id,
            config,
            draft_sync_from_env(),
        ))
    }

    /// Build services over in-memory storage.
    #[must_use]
    pub fn in_memory(
        clock: Clock,
        project_id: ProjectId,
        config: &AssessmentConfig,
        sync: Arc<dyn DraftSync>,
    ) -> Self {
        Self::from_storage(&Storage::in_memory(), clock, project_id, config, sync)
    }

    #[must_use]
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        project_id: ProjectId,
        config: &AssessmentConfig,
        sync: Arc<dyn DraftSync>,
    ) -> Self {
        let questionnaire = Arc::new(config.goals.questionnaire());
        let scoring = Arc::new(config.scoring_table());
        let drafts = Arc::new(DraftService::new(clock, Arc::clone(&storage.drafts)));
        let autosaver = Arc::new(Autosaver::new(Arc::clone(&drafts), config.autosave_delay));
        let assessments = Arc::new(AssessmentService::new(
            clock,
            config.layout,
            questionnaire,
            Arc::clone(&scoring),
            Arc::clone(&drafts),
            autosaver,
            sync,
            Arc::clone(&storage.submissions),
        ));
        let results = Arc::new(ResultsService::new(
            scoring,
            Arc::clone(&storage.submissions),
        ));

        Self {
            project_id,
            assessments,
            results,
            drafts,
        }
    }

    #[must_use]
    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    #[must_use]
    pub fn assessments(&self) -> Arc<AssessmentService> {
        Arc::clone(&self.assessments)
    }

    #[must_use]
    pub fn results(&self) -> Arc<ResultsService> {
        Arc::clone(&self.results)
    }

    #[must_use]
    pub fn drafts(&self) -> Arc<DraftService> {
        Arc::clone(&self.drafts)
    }
}
