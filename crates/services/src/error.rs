//! Shared error types for the services crate.

use thiserror::Error;

use api::ApiError;
use storypath_core::model::{LocationId, ProjectId};

/// Errors emitted by session services.
///
/// `Api` failures are recoverable: in-memory visit state is never corrupted
/// by them, and the user re-triggering the action retries the call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("project {0} not found")]
    ProjectNotFound(ProjectId),
    #[error("project {0} is not published")]
    NotPublished(ProjectId),
    #[error("location {0} is not part of the active project")]
    UnknownLocation(LocationId),
    #[error("location {0} has not been visited")]
    NotVisited(LocationId),
    #[error(transparent)]
    Api(#[from] ApiError),
}
