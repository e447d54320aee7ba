#![forbid(unsafe_code)]

pub mod error;
pub mod geo;
pub mod model;
pub mod proximity;
pub mod qr;
pub mod time;
pub mod visit;

pub use error::PositionError;
pub use geo::{GeoPoint, NEARBY_THRESHOLD_METERS};
pub use proximity::{rank, ProximityEntry};
pub use time::Clock;
pub use visit::VisitState;
