use thiserror::Error;

/// Errors raised while interpreting raw geographic position strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PositionError {
    #[error("malformed position: {raw:?}")]
    MalformedPosition { raw: String },
}
