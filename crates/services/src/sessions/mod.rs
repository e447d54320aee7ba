mod service;
mod workflow;

pub use service::{HuntSession, UnlockOutcome};
pub use workflow::{PositionOutcome, RankedLocation, SessionWorkflow, WorkflowPhase};
