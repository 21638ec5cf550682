//! Collaborator error types.

use thiserror::Error;

/// Result type for remote asset source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors reported by the external processing service client.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// The asset exists but has not propagated to read replicas yet.
    /// Distinct from `NotFound` so pollers can keep waiting.
    #[error("Asset not yet visible: {0}")]
    NotVisibleYet(String),

    #[error("Rate limited, retry after {0}ms")]
    RateLimited(u64),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl SourceError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn not_visible_yet(id: impl Into<String>) -> Self {
        Self::NotVisibleYet(id.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Check if the operation is worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SourceError::NotVisibleYet(_) | SourceError::RateLimited(_) | SourceError::Transport(_)
        )
    }
}

/// Result type for catalog store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors reported by the catalog store client.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The unique constraint on `external_asset_id` was violated.
    #[error("Record already exists: {0}")]
    Conflict(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// True when the failure is the uniqueness guard firing.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_visible_is_retryable_not_found_is_not() {
        assert!(SourceError::not_visible_yet("a").is_retryable());
        assert!(SourceError::transport("timeout").is_retryable());
        assert!(!SourceError::not_found("a").is_retryable());
    }

    #[test]
    fn test_conflict_detection() {
        assert!(StoreError::conflict("dup").is_conflict());
        assert!(!StoreError::not_found("x").is_conflict());
    }
}
