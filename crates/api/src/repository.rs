use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use storypath_core::model::{
    Location, LocationId, NewTrackingRecord, Project, ProjectId, TrackingId, TrackingRecord,
};

use crate::error::ApiError;

/// Repository contract for projects.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Fetch every project, published or not; callers filter.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend call fails.
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError>;

    /// Fetch one project by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if missing, or other backend errors.
    async fn get_project(&self, id: ProjectId) -> Result<Project, ApiError>;

    /// Number of distinct participants who have entered the project.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend call fails.
    async fn participant_count(&self, id: ProjectId) -> Result<u64, ApiError>;
}

/// Repository contract for locations.
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Fetch the locations owned by a project.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend call fails.
    async fn list_locations(&self, project_id: ProjectId) -> Result<Vec<Location>, ApiError>;

    /// Fetch one location by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if missing, or other backend errors.
    async fn get_location(&self, id: LocationId) -> Result<Location, ApiError>;

    /// Number of distinct participants who have visited the location.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend call fails.
    async fn participant_count(&self, id: LocationId) -> Result<u64, ApiError>;
}

/// Repository contract for tracking records.
///
/// Creation is at-least-once on the backend side; callers dedupe against
/// `list_tracking` before creating.
#[async_trait]
pub trait TrackingRepository: Send + Sync {
    /// Fetch all known tracking records.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend call fails.
    async fn list_tracking(&self) -> Result<Vec<TrackingRecord>, ApiError>;

    /// Create a tracking record; the backend assigns the id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend call fails.
    async fn create_tracking(
        &self,
        record: NewTrackingRecord,
    ) -> Result<TrackingRecord, ApiError>;
}

/// Simple in-memory backend for testing and prototyping.
///
/// Mirrors the REST backend's behavior, including blind tracking inserts:
/// dedupe stays the caller's job, which is exactly what the workflow tests
/// need to observe.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    projects: Arc<Mutex<Vec<Project>>>,
    locations: Arc<Mutex<Vec<Location>>>,
    tracking: Arc<Mutex<Vec<TrackingRecord>>>,
    next_tracking_id: Arc<Mutex<u64>>,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a project.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Connection` if the lock is poisoned.
    pub fn insert_project(&self, project: Project) -> Result<(), ApiError> {
        let mut guard = self
            .projects
            .lock()
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        guard.push(project);
        Ok(())
    }

    /// Seed a location.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Connection` if the lock is poisoned.
    pub fn insert_location(&self, location: Location) -> Result<(), ApiError> {
        let mut guard = self
            .locations
            .lock()
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        guard.push(location);
        Ok(())
    }

    /// Snapshot of the stored tracking records, for assertions.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Connection` if the lock is poisoned.
    pub fn tracking_records(&self) -> Result<Vec<TrackingRecord>, ApiError> {
        let guard = self
            .tracking
            .lock()
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryBackend {
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        let guard = self
            .projects
            .lock()
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn get_project(&self, id: ProjectId) -> Result<Project, ApiError> {
        let guard = self
            .projects
            .lock()
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        guard
            .iter()
            .find(|p| p.id() == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn participant_count(&self, id: ProjectId) -> Result<u64, ApiError> {
        let tracking = self
            .tracking
            .lock()
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        let mut participants: Vec<&str> = tracking
            .iter()
            .filter(|t| t.project_id == id)
            .map(|t| t.participant_username.as_str())
            .collect();
        participants.sort_unstable();
        participants.dedup();
        Ok(participants.len() as u64)
    }
}

#[async_trait]
impl LocationRepository for InMemoryBackend {
    async fn list_locations(&self, project_id: ProjectId) -> Result<Vec<Location>, ApiError> {
        let guard = self
            .locations
            .lock()
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|l| l.project_id() == project_id)
            .cloned()
            .collect())
    }

    async fn get_location(&self, id: LocationId) -> Result<Location, ApiError> {
        let guard = self
            .locations
            .lock()
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        guard
            .iter()
            .find(|l| l.id() == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn participant_count(&self, id: LocationId) -> Result<u64, ApiError> {
        let tracking = self
            .tracking
            .lock()
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        let mut participants: Vec<&str> = tracking
            .iter()
            .filter(|t| t.location_id == id)
            .map(|t| t.participant_username.as_str())
            .collect();
        participants.sort_unstable();
        participants.dedup();
        Ok(participants.len() as u64)
    }
}

#[async_trait]
impl TrackingRepository for InMemoryBackend {
    async fn list_tracking(&self) -> Result<Vec<TrackingRecord>, ApiError> {
        self.tracking_records()
    }

    async fn create_tracking(
        &self,
        record: NewTrackingRecord,
    ) -> Result<TrackingRecord, ApiError> {
        let id = {
            let mut next = self
                .next_tracking_id
                .lock()
                .map_err(|e| ApiError::Connection(e.to_string()))?;
            *next += 1;
            *next
        };
        let stored = TrackingRecord {
            id: TrackingId::new(id),
            project_id: record.project_id,
            location_id: record.location_id,
            participant_username: record.participant_username,
            points: record.points,
        };
        let mut guard = self
            .tracking
            .lock()
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        guard.push(stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storypath_core::model::{DisplayMode, ScoringMode};

    fn project(id: u64, published: bool) -> Project {
        Project::new(
            ProjectId::new(id),
            format!("Project {id}"),
            "Find the spots",
            "Start at the gate",
            DisplayMode::InitialClue,
            ScoringMode::QrScans,
            published,
        )
    }

    fn location(id: u64, project_id: u64) -> Location {
        Location::new(
            LocationId::new(id),
            ProjectId::new(project_id),
            format!("Location {id}"),
            "(-27.4977, 153.0129)",
            "<p>hi</p>",
            None,
            10,
        )
    }

    #[tokio::test]
    async fn get_project_returns_not_found_when_missing() {
        let backend = InMemoryBackend::new();
        let err = backend.get_project(ProjectId::new(1)).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn list_locations_filters_by_project() {
        let backend = InMemoryBackend::new();
        backend.insert_location(location(1, 7)).unwrap();
        backend.insert_location(location(2, 8)).unwrap();
        backend.insert_location(location(3, 7)).unwrap();

        let locations = backend.list_locations(ProjectId::new(7)).await.unwrap();
        let ids: Vec<u64> = locations.iter().map(|l| l.id().value()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn create_tracking_assigns_ids_and_does_not_dedupe() {
        let backend = InMemoryBackend::new();
        backend.insert_project(project(1, true)).unwrap();
        let record = NewTrackingRecord {
            project_id: ProjectId::new(1),
            location_id: LocationId::new(2),
            participant_username: "ada".into(),
            points: 10,
        };

        let first = backend.create_tracking(record.clone()).await.unwrap();
        let second = backend.create_tracking(record).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(backend.tracking_records().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn get_location_returns_stored_row_or_not_found() {
        let backend = InMemoryBackend::new();
        backend.insert_location(location(5, 7)).unwrap();

        let found = backend.get_location(LocationId::new(5)).await.unwrap();
        assert_eq!(found.id().value(), 5);
        assert_eq!(found.project_id().value(), 7);

        let err = backend.get_location(LocationId::new(6)).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn poisoned_lock_surfaces_as_connection_error() {
        let backend = InMemoryBackend::new();
        let projects = Arc::clone(&backend.projects);
        let _ = std::thread::spawn(move || {
            let _guard = projects.lock().unwrap();
            panic!("poison the projects lock");
        })
        .join();

        let err = backend.list_projects().await.unwrap_err();
        assert!(matches!(err, ApiError::Connection(_)));
        let err = backend.insert_project(project(1, true)).unwrap_err();
        assert!(matches!(err, ApiError::Connection(_)));
    }

    #[tokio::test]
    async fn participant_count_dedupes_usernames() {
        let backend = InMemoryBackend::new();
        for (loc, user) in [(2, "ada"), (3, "ada"), (2, "bob")] {
            backend
                .create_tracking(NewTrackingRecord {
                    project_id: ProjectId::new(1),
                    location_id: LocationId::new(loc),
                    participant_username: user.into(),
                    points: 0,
                })
                .await
                .unwrap();
        }

        let by_project =
            ProjectRepository::participant_count(&backend, ProjectId::new(1)).await.unwrap();
        assert_eq!(by_project, 2);
        let by_location =
            LocationRepository::participant_count(&backend, LocationId::new(2)).await.unwrap();
        assert_eq!(by_location, 2);
    }
}
