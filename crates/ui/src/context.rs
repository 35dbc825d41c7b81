use std::sync::Arc;

use sdg_core::model::ProjectId;
use services::{AssessmentService, ResultsService};

/// What the views need from the composition root.
pub trait UiApp: Send + Sync {
    fn project_id(&self) -> ProjectId;

    fn assessments(&self) -> Arc<AssessmentService>;
    fn results(&self) -> Arc<ResultsService>;
}

#[derive(Clone)]
pub struct AppContext {
    project_id: ProjectId,
    assessments: Arc<AssessmentService>,
    results: Arc<ResultsService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            project_id: app.project_id(),
            assessments: app.assessments(),
            results: app.results(),
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
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
