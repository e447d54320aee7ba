use chrono::{DateTime, Utc};

use storypath_core::geo::GeoPoint;
use storypath_core::model::{Location, LocationId, Project};
use storypath_core::proximity::{self, ProximityEntry};
use storypath_core::visit::VisitState;

use crate::error::SessionError;

//
// ─── UNLOCK OUTCOME ────────────────────────────────────────────────────────────
//

/// Result of an unlock trigger against the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockOutcome {
    pub location_id: LocationId,
    /// False when the location was already visited (idempotent no-op).
    pub newly_visited: bool,
    /// Cumulative score after the trigger.
    pub score: u32,
    /// Visit count after the trigger.
    pub visit_count: usize,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory hunt session for one project and participant.
///
/// Owns the fetched project, its locations, and the visit state. All visit
/// mutations go through [`HuntSession::unlock`]; nothing else writes the
/// counters, which is what keeps the score/count invariants honest. The
/// session is created empty, lives for one play-through, and is discarded at
/// the end; nothing persists across restarts.
#[derive(Debug)]
pub struct HuntSession {
    project: Project,
    locations: Vec<Location>,
    participant_username: String,
    visits: VisitState,
    started_at: DateTime<Utc>,
}

impl HuntSession {
    #[must_use]
    pub fn new(
        project: Project,
        locations: Vec<Location>,
        participant_username: impl Into<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            project,
            locations,
            participant_username: participant_username.into(),
            visits: VisitState::new(),
            started_at,
        }
    }

    #[must_use]
    pub fn project(&self) -> &Project {
        &self.project
    }

    #[must_use]
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    #[must_use]
    pub fn participant_username(&self) -> &str {
        &self.participant_username
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Look up a location of the active project.
    #[must_use]
    pub fn find_location(&self, id: LocationId) -> Option<&Location> {
        self.locations.iter().find(|l| l.id() == id)
    }

    /// Sum of every location's score, the maximum attainable for the project.
    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.locations.iter().map(Location::score_points).sum()
    }

    #[must_use]
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    /// Cumulative score across visited locations.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.visits.score()
    }

    #[must_use]
    pub fn visit_count(&self) -> usize {
        self.visits.visit_count()
    }

    #[must_use]
    pub fn is_visited(&self, id: LocationId) -> bool {
        self.visits.is_visited(id)
    }

    /// Visited locations in unlock order, for display history.
    #[must_use]
    pub fn visited_locations(&self) -> Vec<&Location> {
        self.visits
            .visited()
            .iter()
            .filter_map(|id| self.find_location(*id))
            .collect()
    }

    /// Unlock a location by id.
    ///
    /// Idempotent: a second unlock of the same id reports
    /// `newly_visited: false` and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownLocation` if the id does not belong to
    /// the active project; visit state is unchanged.
    pub fn unlock(&mut self, id: LocationId) -> Result<UnlockOutcome, SessionError> {
        let location = self
            .find_location(id)
            .ok_or(SessionError::UnknownLocation(id))?;
        let score_points = location.score_points();
        let newly_visited = self.visits.record_visit(id, score_points);

        Ok(UnlockOutcome {
            location_id: id,
            newly_visited,
            score: self.visits.score(),
            visit_count: self.visits.visit_count(),
        })
    }

    /// Fetch a visited location for content display.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotVisited` if the location was never unlocked,
    /// or `SessionError::UnknownLocation` if it is not part of the project.
    pub fn select_displayed(&self, id: LocationId) -> Result<&Location, SessionError> {
        let location = self
            .find_location(id)
            .ok_or(SessionError::UnknownLocation(id))?;
        if !self.visits.is_visited(id) {
            return Err(SessionError::NotVisited(id));
        }
        Ok(location)
    }

    /// Rank the project's locations by distance from the device position.
    #[must_use]
    pub fn rank_proximity(&self, origin: GeoPoint) -> Vec<ProximityEntry<'_>> {
        proximity::rank(origin, &self.locations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storypath_core::model::{DisplayMode, ProjectId, ScoringMode};
    use storypath_core::time::fixed_now;

    fn project() -> Project {
        Project::new(
            ProjectId::new(1),
            "Campus Hunt",
            "Find the landmarks",
            "Start at the gate",
            DisplayMode::InitialClue,
            ScoringMode::QrScans,
            true,
        )
    }

    fn location(id: u64, score: u32) -> Location {
        Location::new(
            LocationId::new(id),
            ProjectId::new(1),
            format!("Location {id}"),
            "(-27.4977, 153.0129)",
            "<p>content</p>",
            None,
            score,
        )
    }

    fn session() -> HuntSession {
        HuntSession::new(
            project(),
            vec![location(1, 10), location(2, 25)],
            "ada",
            fixed_now(),
        )
    }

    #[test]
    fn unlock_accumulates_score_and_count() {
        let mut session = session();
        session.unlock(LocationId::new(1)).unwrap();
        let outcome = session.unlock(LocationId::new(2)).unwrap();
        assert_eq!(outcome.score, 35);
        assert_eq!(outcome.visit_count, 2);
    }

    #[test]
    fn double_unlock_is_idempotent() {
        let mut session = session();
        let first = session.unlock(LocationId::new(1)).unwrap();
        assert!(first.newly_visited);
        let second = session.unlock(LocationId::new(1)).unwrap();
        assert!(!second.newly_visited);
        assert_eq!(second.score, first.score);
        assert_eq!(second.visit_count, first.visit_count);
    }

    #[test]
    fn unlock_of_foreign_id_rejects_without_state_change() {
        let mut session = session();
        session.unlock(LocationId::new(1)).unwrap();
        let err = session.unlock(LocationId::new(99)).unwrap_err();
        assert!(matches!(err, SessionError::UnknownLocation(_)));
        assert_eq!(session.score(), 10);
        assert_eq!(session.visit_count(), 1);
    }

    #[test]
    fn select_displayed_requires_a_visit() {
        let mut session = session();
        let err = session.select_displayed(LocationId::new(1)).unwrap_err();
        assert!(matches!(err, SessionError::NotVisited(_)));

        session.unlock(LocationId::new(1)).unwrap();
        let shown = session.select_displayed(LocationId::new(1)).unwrap();
        assert_eq!(shown.id(), LocationId::new(1));
    }

    #[test]
    fn totals_cover_the_whole_project() {
        let session = session();
        assert_eq!(session.total_score(), 35);
        assert_eq!(session.location_count(), 2);
    }

    #[test]
    fn visited_locations_follow_unlock_order() {
        let mut session = session();
        session.unlock(LocationId::new(2)).unwrap();
        session.unlock(LocationId::new(1)).unwrap();
        let names: Vec<&str> = session.visited_locations().iter().map(|l| l.name()).collect();
        assert_eq!(names, vec!["Location 2", "Location 1"]);
    }
}
