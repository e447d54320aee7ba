use serde::{Deserialize, Serialize};

use crate::model::ids::ProjectId;

//
// ─── DISPLAY MODE ──────────────────────────────────────────────────────────────
//

/// What the project home screen shows before any location is unlocked.
///
/// Wire values match the backend's `homescreen_display` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    #[serde(rename = "Display initial clue")]
    InitialClue,
    #[serde(rename = "Display all locations")]
    AllLocations,
    #[serde(rename = "Display instructions")]
    InstructionsOnly,
}

//
// ─── SCORING MODE ──────────────────────────────────────────────────────────────
//

/// How participants accumulate points, per the backend's `participant_scoring`
/// column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoringMode {
    #[serde(rename = "Not Scored")]
    NotScored,
    #[serde(rename = "Number of Scanned QR Codes")]
    QrScans,
    #[serde(rename = "Number of Locations Entered")]
    LocationsEntered,
}

impl ScoringMode {
    /// Whether the project keeps score at all.
    #[must_use]
    pub fn is_scored(&self) -> bool {
        !matches!(self, ScoringMode::NotScored)
    }
}

//
// ─── PROJECT ───────────────────────────────────────────────────────────────────
//

/// A published scavenger hunt, immutable for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    title: String,
    instructions: String,
    initial_clue: String,
    homescreen_display: DisplayMode,
    participant_scoring: ScoringMode,
    is_published: bool,
}

impl Project {
    #[must_use]
    pub fn new(
        id: ProjectId,
        title: impl Into<String>,
        instructions: impl Into<String>,
        initial_clue: impl Into<String>,
        homescreen_display: DisplayMode,
        participant_scoring: ScoringMode,
        is_published: bool,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            instructions: instructions.into(),
            initial_clue: initial_clue.into(),
            homescreen_display,
            participant_scoring,
            is_published,
        }
    }

    #[must_use]
    pub fn id(&self) -> ProjectId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    #[must_use]
    pub fn initial_clue(&self) -> &str {
        &self.initial_clue
    }

    #[must_use]
    pub fn homescreen_display(&self) -> DisplayMode {
        self.homescreen_display
    }

    #[must_use]
    pub fn participant_scoring(&self) -> ScoringMode {
        self.participant_scoring
    }

    #[must_use]
    pub fn is_published(&self) -> bool {
        self.is_published
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoring_mode_scored_variants() {
        assert!(!ScoringMode::NotScored.is_scored());
        assert!(ScoringMode::QrScans.is_scored());
        assert!(ScoringMode::LocationsEntered.is_scored());
    }

    #[test]
    fn display_mode_wire_names() {
        let parsed: DisplayMode = serde_json::from_str("\"Display initial clue\"").unwrap();
        assert_eq!(parsed, DisplayMode::InitialClue);
        let parsed: DisplayMode = serde_json::from_str("\"Display all locations\"").unwrap();
        assert_eq!(parsed, DisplayMode::AllLocations);
    }
}
