use std::sync::Arc;

use api::{
    LocationRepository, ProjectRepository, RestClient, RestConfig, TrackingRepository,
};
use storypath_core::model::ProjectId;
use storypath_core::Clock;

use crate::error::SessionError;
use crate::project_service::ProjectService;
use crate::sessions::SessionWorkflow;

/// Assembles app-facing services over one backend.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    projects: Arc<dyn ProjectRepository>,
    locations: Arc<dyn LocationRepository>,
    tracking: Arc<dyn TrackingRepository>,
    project_service: ProjectService,
}

impl AppServices {
    /// Build services backed by the REST backend.
    #[must_use]
    pub fn new_rest(config: RestConfig, clock: Clock) -> Self {
        let client = Arc::new(RestClient::new(config));
        Self::new(
            clock,
            Arc::clone(&client) as Arc<dyn ProjectRepository>,
            Arc::clone(&client) as Arc<dyn LocationRepository>,
            client as Arc<dyn TrackingRepository>,
        )
    }

    /// Build services over arbitrary repositories (in-memory for tests).
    #[must_use]
    pub fn new(
        clock: Clock,
        projects: Arc<dyn ProjectRepository>,
        locations: Arc<dyn LocationRepository>,
        tracking: Arc<dyn TrackingRepository>,
    ) -> Self {
        let project_service = ProjectService::new(Arc::clone(&projects), Arc::clone(&locations));
        Self {
            clock,
            projects,
            locations,
            tracking,
            project_service,
        }
    }

    #[must_use]
    pub fn projects(&self) -> &ProjectService {
        &self.project_service
    }

    /// Start a hunt session for a published project.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the project cannot be loaded.
    pub async fn start_session(
        &self,
        project_id: ProjectId,
        participant_username: impl Into<String>,
    ) -> Result<SessionWorkflow, SessionError> {
        SessionWorkflow::start(
            self.clock,
            project_id,
            participant_username,
            self.projects.as_ref(),
            self.locations.as_ref(),
            Arc::clone(&self.tracking),
        )
        .await
    }
}
