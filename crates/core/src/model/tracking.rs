use serde::{Deserialize, Serialize};

use crate::model::ids::{LocationId, ProjectId, TrackingId};

/// A server-side log entry linking a participant, project, and location visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingRecord {
    pub id: TrackingId,
    pub project_id: ProjectId,
    pub location_id: LocationId,
    pub participant_username: String,
    pub points: u32,
}

impl TrackingRecord {
    /// Whether this record covers the given (project, location, participant)
    /// triple. The triple is the dedupe identity; `points` and `id` are not
    /// part of it.
    #[must_use]
    pub fn matches(
        &self,
        project_id: ProjectId,
        location_id: LocationId,
        participant_username: &str,
    ) -> bool {
        self.project_id == project_id
            && self.location_id == location_id
            && self.participant_username == participant_username
    }
}

/// Payload for creating a tracking record; the backend assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTrackingRecord {
    pub project_id: ProjectId,
    pub location_id: LocationId,
    pub participant_username: String,
    pub points: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_on_triple_only() {
        let record = TrackingRecord {
            id: TrackingId::new(1),
            project_id: ProjectId::new(2),
            location_id: LocationId::new(3),
            participant_username: "ada".into(),
            points: 10,
        };
        assert!(record.matches(ProjectId::new(2), LocationId::new(3), "ada"));
        assert!(!record.matches(ProjectId::new(2), LocationId::new(3), "bob"));
        assert!(!record.matches(ProjectId::new(2), LocationId::new(4), "ada"));
        assert!(!record.matches(ProjectId::new(9), LocationId::new(3), "ada"));
    }
}
