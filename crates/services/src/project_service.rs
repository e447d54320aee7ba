use std::sync::Arc;

use api::{ApiError, LocationRepository, ProjectRepository};
use storypath_core::model::{Location, LocationId, Project, ProjectId};

use crate::error::SessionError;

/// A project together with its locations and the attainable totals.
#[derive(Debug, Clone)]
pub struct ProjectOverview {
    pub project: Project,
    pub locations: Vec<Location>,
    pub total_score: u32,
    pub location_count: usize,
}

/// Read-side access to projects and their locations.
#[derive(Clone)]
pub struct ProjectService {
    projects: Arc<dyn ProjectRepository>,
    locations: Arc<dyn LocationRepository>,
}

impl ProjectService {
    #[must_use]
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        locations: Arc<dyn LocationRepository>,
    ) -> Self {
        Self {
            projects,
            locations,
        }
    }

    /// Published projects only; unpublished ones are invisible to clients.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend call fails.
    pub async fn list_published(&self) -> Result<Vec<Project>, ApiError> {
        let projects = self.projects.list_projects().await?;
        Ok(projects.into_iter().filter(Project::is_published).collect())
    }

    /// Load a published project with its locations.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ProjectNotFound` if the id is unknown,
    /// `SessionError::NotPublished` for draft projects, or an `Api` error for
    /// backend failures.
    pub async fn overview(&self, id: ProjectId) -> Result<ProjectOverview, SessionError> {
        let project = match self.projects.get_project(id).await {
            Ok(project) => project,
            Err(ApiError::NotFound) => return Err(SessionError::ProjectNotFound(id)),
            Err(err) => return Err(err.into()),
        };
        if !project.is_published() {
            return Err(SessionError::NotPublished(id));
        }

        let locations = self.locations.list_locations(id).await?;
        let total_score = locations.iter().map(Location::score_points).sum();
        let location_count = locations.len();

        Ok(ProjectOverview {
            project,
            locations,
            total_score,
            location_count,
        })
    }

    /// Number of distinct participants who entered the project.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend call fails.
    pub async fn project_participants(&self, id: ProjectId) -> Result<u64, ApiError> {
        self.projects.participant_count(id).await
    }

    /// Number of distinct participants who visited the location.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend call fails.
    pub async fn location_participants(&self, id: LocationId) -> Result<u64, ApiError> {
        self.locations.participant_count(id).await
    }
}
