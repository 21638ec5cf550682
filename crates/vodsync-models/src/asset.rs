//! Remote asset models.
//!
//! A remote asset is a video tracked by the external processing service.
//! The service assigns the identifier at upload time and moves the asset
//! through its transcode states until it is playable or failed.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier assigned by the external processing service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct AssetId(pub String);

impl AssetId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the identifier carries no characters at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AssetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Processing state reported by the external service.
///
/// `Ready` and `Error` are terminal; everything else is expected to
/// transition further.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingState {
    /// Upload was initiated but bytes have not (fully) arrived
    #[default]
    PendingUpload,
    /// Waiting for a transcode slot
    Queued,
    /// Service is pulling the source file
    Downloading,
    /// Transcode in progress
    InProgress,
    /// Playable renditions exist
    Ready,
    /// Processing failed
    Error,
}

impl ProcessingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingState::PendingUpload => "pending_upload",
            ProcessingState::Queued => "queued",
            ProcessingState::Downloading => "downloading",
            ProcessingState::InProgress => "in_progress",
            ProcessingState::Ready => "ready",
            ProcessingState::Error => "error",
        }
    }

    /// Check if this is a terminal state (no more transitions expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessingState::Ready | ProcessingState::Error)
    }
}

impl fmt::Display for ProcessingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A video known to the external processing service.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RemoteAsset {
    /// Stable identifier assigned by the service at upload time
    pub id: AssetId,

    /// Current processing state
    #[serde(default)]
    pub state: ProcessingState,

    /// True only when playable renditions exist
    #[serde(default)]
    pub ready_to_stream: bool,

    /// Progress indicator, meaningful only in non-terminal states
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<u8>,

    /// Creation timestamp set by the service
    pub created_at: DateTime<Utc>,

    /// Duration in seconds, known once analysis completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,

    /// Display name reported by the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Source file size, if the service reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,

    /// Error description when `state` is `Error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<String>,

    /// Machine-readable error code when `state` is `Error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl RemoteAsset {
    /// Create a minimal asset in the initial upload state.
    pub fn new(id: impl Into<AssetId>) -> Self {
        Self {
            id: id.into(),
            state: ProcessingState::PendingUpload,
            ready_to_stream: false,
            percent_complete: None,
            created_at: Utc::now(),
            duration_seconds: None,
            display_name: None,
            size_bytes: None,
            error_reason: None,
            error_code: None,
        }
    }

    /// True when the asset reached `Ready` and playback manifests exist.
    pub fn is_playable(&self) -> bool {
        self.state == ProcessingState::Ready && self.ready_to_stream
    }

    /// Age of the asset relative to `now`, in fractional hours.
    pub fn age_hours(&self, now: DateTime<Utc>) -> f64 {
        (now - self.created_at).num_seconds() as f64 / 3600.0
    }
}
