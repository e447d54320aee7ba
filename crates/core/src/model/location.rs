use serde::{Deserialize, Serialize};

use crate::error::PositionError;
use crate::geo::GeoPoint;
use crate::model::ids::{LocationId, ProjectId};

/// A single hunt location, immutable once fetched for the session.
///
/// The geographic position is kept in the raw `"(lat, lon)"` form the backend
/// serves; it is parsed lazily so one malformed row never poisons the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    id: LocationId,
    project_id: ProjectId,
    location_name: String,
    location_position: String,
    location_content: String,
    clue: Option<String>,
    score_points: u32,
}

impl Location {
    #[must_use]
    pub fn new(
        id: LocationId,
        project_id: ProjectId,
        name: impl Into<String>,
        position: impl Into<String>,
        content: impl Into<String>,
        clue: Option<String>,
        score_points: u32,
    ) -> Self {
        Self {
            id,
            project_id,
            location_name: name.into(),
            location_position: position.into(),
            location_content: content.into(),
            clue,
            score_points,
        }
    }

    #[must_use]
    pub fn id(&self) -> LocationId {
        self.id
    }

    #[must_use]
    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.location_name
    }

    /// Raw position string as served by the backend.
    #[must_use]
    pub fn position_raw(&self) -> &str {
        &self.location_position
    }

    /// Parse the raw position into coordinates.
    ///
    /// # Errors
    ///
    /// Returns `PositionError::MalformedPosition` if either component is not a
    /// finite decimal number.
    pub fn position(&self) -> Result<GeoPoint, PositionError> {
        self.location_position.parse()
    }

    /// HTML content payload shown once the location is unlocked.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.location_content
    }

    /// Clue pointing to the next location, if the author set one.
    #[must_use]
    pub fn clue(&self) -> Option<&str> {
        self.clue.as_deref()
    }

    #[must_use]
    pub fn score_points(&self) -> u32 {
        self.score_points
    }
}
