mod ids;
mod location;
mod project;
mod tracking;

pub use ids::{LocationId, ProjectId, TrackingId};
pub use location::Location;
pub use project::{DisplayMode, Project, ScoringMode};
pub use tracking::{NewTrackingRecord, TrackingRecord};
