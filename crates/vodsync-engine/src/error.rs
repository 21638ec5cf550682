//! Engine error types.
//!
//! Per-item failures inside bulk passes are captured into result lists and
//! never surface here; `SyncError` is reserved for failures to even begin
//! an operation (unreachable collaborator, invalid caller input).

use thiserror::Error;

use vodsync_stores::{SourceError, StoreError};

pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Remote source error: {0}")]
    Source(#[from] SourceError),

    #[error("Catalog store error: {0}")]
    Store(#[from] StoreError),
}

impl SyncError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
