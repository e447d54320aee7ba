use crate::model::LocationId;

/// Session-scoped record of which locations have been unlocked.
///
/// Invariants: cumulative score equals the sum of the visited locations'
/// score values, and the visit count equals the size of the visited set.
/// Both hold because the only mutation path is [`VisitState::record_visit`].
/// Insertion order is kept for display history; membership ignores it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitState {
    visited: Vec<LocationId>,
    score: u32,
}

impl VisitState {
    /// Creates an empty visit state, as at session start.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a visit, adding `score_points` to the cumulative score.
    ///
    /// Returns `true` if the location was newly visited, `false` if it was
    /// already present (no-op; re-unlocking never double-counts).
    pub fn record_visit(&mut self, id: LocationId, score_points: u32) -> bool {
        if self.is_visited(id) {
            return false;
        }
        self.visited.push(id);
        self.score += score_points;
        true
    }

    #[must_use]
    pub fn is_visited(&self, id: LocationId) -> bool {
        self.visited.contains(&id)
    }

    /// Visited location ids in unlock order.
    #[must_use]
    pub fn visited(&self) -> &[LocationId] {
        &self.visited
    }

    /// Cumulative score across all visited locations.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Number of visited locations.
    #[must_use]
    pub fn visit_count(&self) -> usize {
        self.visited.len()
    }
}
