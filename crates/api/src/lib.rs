#![forbid(unsafe_code)]

pub mod error;
pub mod repository;
pub mod rest;

pub use error::ApiError;
pub use repository::{InMemoryBackend, LocationRepository, ProjectRepository, TrackingRepository};
pub use rest::{RestClient, RestConfig};
