//! Stuck-upload analysis and sweep results.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::asset::{AssetId, ProcessingState, RemoteAsset};

/// A remote asset flagged as a stuck upload.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CleanupCandidate {
    pub id: AssetId,
    /// Age relative to the analysis time, in fractional hours
    pub age_hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl CleanupCandidate {
    /// Flag an asset, capturing its age at analysis time.
    pub fn from_asset(asset: &RemoteAsset, now: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            id: asset.id.clone(),
            age_hours: asset.age_hours(now),
            size_bytes: asset.size_bytes,
            display_name: asset.display_name.clone(),
        }
    }
}

/// Read-only analysis of the remote source's upload population.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct StuckAnalysis {
    /// Every listed asset, counted by processing state
    pub counts_by_state: HashMap<ProcessingState, u64>,
    /// Stuck uploads past the age threshold
    pub candidates: Vec<CleanupCandidate>,
    /// Threshold the analysis was run with
    pub max_age_hours: f64,
    /// Listing failures that truncated the snapshot; non-empty means the
    /// candidate set may be incomplete
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fetch_errors: Vec<String>,
}

impl StuckAnalysis {
    pub fn total_assets(&self) -> u64 {
        self.counts_by_state.values().sum()
    }
}

/// Per-id outcome of a sweep.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SweepItem {
    pub id: AssetId,
    pub deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of one sweep pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SweepResult {
    /// Candidates matching the selection criteria
    pub total_stuck: u64,
    /// Deletions that succeeded
    pub deleted: u64,
    /// Deletions that failed
    pub failed: u64,
    /// Whether this pass was a dry run (no deletes issued)
    pub dry_run: bool,
    /// Per-id outcomes, in sweep order
    #[serde(default)]
    pub items: Vec<SweepItem>,
    /// Listing failures that truncated the underlying analysis
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fetch_errors: Vec<String>,
}
