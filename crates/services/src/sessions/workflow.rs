use std::sync::Arc;

use api::{ApiError, LocationRepository, ProjectRepository, TrackingRepository};
use storypath_core::geo::GeoPoint;
use storypath_core::model::{Location, LocationId, NewTrackingRecord, ProjectId, TrackingRecord};
use storypath_core::qr;
use storypath_core::Clock;

use super::service::{HuntSession, UnlockOutcome};
use crate::error::SessionError;

/// Observable phase of the unlock workflow.
///
/// Triggers move the workflow through `FetchingLocation` and `Tracking`,
/// ending in `Idle` on success or `Error` on a failed backend write.
/// `Error` is recoverable; the next trigger runs normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowPhase {
    #[default]
    Idle,
    FetchingLocation,
    Tracking,
    Error,
}

/// One row of a proximity ranking, detached from the session borrow.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedLocation {
    pub location_id: LocationId,
    pub name: String,
    pub distance_meters: f64,
    pub nearby: bool,
}

/// What a position update produced: the full ranking plus any unlocks.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionOutcome {
    /// All candidates sorted ascending by distance. Only the `nearby` flag
    /// drives unlocks; the order is informational.
    pub ranked: Vec<RankedLocation>,
    pub unlocked: Vec<UnlockOutcome>,
}

/// Event-driven driver for a hunt session.
///
/// Owns the [`HuntSession`] and serializes every visit mutation through its
/// own methods. Position updates, QR scans, and backend responses are
/// discrete events handled one at a time, so the session needs no locking.
pub struct SessionWorkflow {
    session: HuntSession,
    tracking: Arc<dyn TrackingRepository>,
    known_tracking: Vec<TrackingRecord>,
    phase: WorkflowPhase,
}

impl std::fmt::Debug for SessionWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionWorkflow")
            .field("session", &self.session)
            .field("known_tracking", &self.known_tracking)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl SessionWorkflow {
    /// Fetch the project, its locations, and the known tracking records, and
    /// start an empty session for the participant.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ProjectNotFound` for an unknown id,
    /// `SessionError::NotPublished` for a draft project, or an `Api` error if
    /// any fetch fails.
    pub async fn start(
        clock: Clock,
        project_id: ProjectId,
        participant_username: impl Into<String>,
        projects: &dyn ProjectRepository,
        locations: &dyn LocationRepository,
        tracking: Arc<dyn TrackingRepository>,
    ) -> Result<Self, SessionError> {
        let project = match projects.get_project(project_id).await {
            Ok(project) => project,
            Err(ApiError::NotFound) => return Err(SessionError::ProjectNotFound(project_id)),
            Err(err) => return Err(err.into()),
        };
        if !project.is_published() {
            return Err(SessionError::NotPublished(project_id));
        }

        let project_locations = locations.list_locations(project_id).await?;
        let known_tracking = tracking.list_tracking().await?;

        Ok(Self {
            session: HuntSession::new(
                project,
                project_locations,
                participant_username,
                clock.now(),
            ),
            tracking,
            known_tracking,
            phase: WorkflowPhase::Idle,
        })
    }

    #[must_use]
    pub fn session(&self) -> &HuntSession {
        &self.session
    }

    #[must_use]
    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    /// Handle scanned QR text.
    ///
    /// Returns `Ok(None)` when the text carries no `Location ID:` payload;
    /// that is a normal outcome, never a failure.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownLocation` for an id outside the active
    /// project (no state change), or an `Api` error if the tracking write
    /// fails after the unlock.
    pub async fn handle_qr_scan(
        &mut self,
        scanned: &str,
    ) -> Result<Option<UnlockOutcome>, SessionError> {
        let Some(id) = qr::decode_location_id(scanned) else {
            tracing::debug!("scanned text carries no location id");
            return Ok(None);
        };
        self.trigger(id).await.map(Some)
    }

    /// Handle a device position update.
    ///
    /// Ranks all locations by distance and unlocks every one within the
    /// nearby threshold. Recomputation is O(locations) and synchronous, so it
    /// finishes before the next update is processed.
    ///
    /// # Errors
    ///
    /// Returns an `Api` error if a tracking write fails; visits recorded up
    /// to that point are kept.
    pub async fn handle_position_update(
        &mut self,
        origin: GeoPoint,
    ) -> Result<PositionOutcome, SessionError> {
        let ranked: Vec<RankedLocation> = self
            .session
            .rank_proximity(origin)
            .iter()
            .map(|entry| RankedLocation {
                location_id: entry.location.id(),
                name: entry.location.name().to_string(),
                distance_meters: entry.distance_meters,
                nearby: entry.nearby,
            })
            .collect();

        let mut unlocked = Vec::new();
        for row in ranked.iter().filter(|row| row.nearby) {
            unlocked.push(self.trigger(row.location_id).await?);
        }

        Ok(PositionOutcome { ranked, unlocked })
    }

    /// Unlock a location and make sure the backend has a tracking record for
    /// it. Safe to call repeatedly for the same id: the unlock is idempotent
    /// and the tracking write is deduped.
    async fn trigger(&mut self, id: LocationId) -> Result<UnlockOutcome, SessionError> {
        self.phase = WorkflowPhase::FetchingLocation;
        let Some(points) = self.session.find_location(id).map(Location::score_points) else {
            self.phase = WorkflowPhase::Idle;
            return Err(SessionError::UnknownLocation(id));
        };
        let outcome = self.session.unlock(id)?;

        self.phase = WorkflowPhase::Tracking;
        if let Err(err) = self.ensure_tracking(id, points).await {
            self.phase = WorkflowPhase::Error;
            tracing::warn!(location = %id, error = %err, "tracking write failed; retryable");
            return Err(err);
        }

        self.phase = WorkflowPhase::Idle;
        Ok(outcome)
    }

    /// Exactly one tracking record per (project, location, participant):
    /// check the records fetched at session start plus any created since,
    /// create only when absent.
    async fn ensure_tracking(
        &mut self,
        location_id: LocationId,
        points: u32,
    ) -> Result<(), SessionError> {
        let project_id = self.session.project().id();
        let participant = self.session.participant_username().to_string();
        if self
            .known_tracking
            .iter()
            .any(|t| t.matches(project_id, location_id, &participant))
        {
            return Ok(());
        }

        let created = self
            .tracking
            .create_tracking(NewTrackingRecord {
                project_id,
                location_id,
                participant_username: participant,
                points,
            })
            .await?;
        self.known_tracking.push(created);
        Ok(())
    }
}
