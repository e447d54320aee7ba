#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod project_service;
pub mod sessions;

pub use storypath_core::Clock;

pub use app_services::AppServices;
pub use error::SessionError;
pub use project_service::{ProjectOverview, ProjectService};
pub use sessions::{
    HuntSession, PositionOutcome, RankedLocation, SessionWorkflow, UnlockOutcome, WorkflowPhase,
};
