//! Reconciliation reports and repair results.
//!
//! Bulk operations never signal per-item failure out of band; every pass
//! returns one of these accumulator types with explicit counts so callers
//! never have to guess whether "no error" meant "fully succeeded".

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::asset::AssetId;
use crate::catalog::RecordId;

/// Kind of discrepancy found during reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SyncIssueKind {
    /// Asset exists remotely but has no catalog record
    MissingInCatalog,
    /// Catalog record references an asset the remote no longer has
    MissingInRemote,
    /// Both sides exist but tracked fields differ
    DataMismatch,
}

impl SyncIssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncIssueKind::MissingInCatalog => "missing_in_catalog",
            SyncIssueKind::MissingInRemote => "missing_in_remote",
            SyncIssueKind::DataMismatch => "data_mismatch",
        }
    }
}

impl fmt::Display for SyncIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One discrepancy between the remote source and the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SyncIssue {
    pub external_asset_id: AssetId,
    pub kind: SyncIssueKind,
    /// Human-readable field differences or context notes
    #[serde(default)]
    pub details: Vec<String>,
}

impl SyncIssue {
    pub fn new(external_asset_id: impl Into<AssetId>, kind: SyncIssueKind) -> Self {
        Self {
            external_asset_id: external_asset_id.into(),
            kind,
            details: Vec::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }
}

/// Aggregate result of one reconciliation pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SyncReport {
    /// Assets listed from the remote source
    pub total_remote: u64,
    /// Catalog records carrying an external asset id
    pub total_catalog: u64,
    /// Ids present on both sides with no tracked-field differences
    pub in_sync: u64,
    /// Remote ids without a catalog record
    pub missing_in_catalog: u64,
    /// Catalog external ids without a remote asset
    pub missing_in_remote: u64,
    /// Every discrepancy found, one entry per issue
    #[serde(default)]
    pub issues: Vec<SyncIssue>,
    /// Listing failures that truncated the snapshot (pass still completed)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fetch_errors: Vec<String>,
}

impl SyncReport {
    /// Issues of one kind, in report order.
    pub fn issues_of_kind(&self, kind: SyncIssueKind) -> impl Iterator<Item = &SyncIssue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }

    /// The issue recorded for a specific id, if any.
    pub fn issue_for(&self, id: &AssetId) -> Option<&SyncIssue> {
        self.issues.iter().find(|i| &i.external_asset_id == id)
    }
}

/// Outcome of one corrective action on one asset id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RepairOutcome {
    /// A catalog record was created from remote metadata
    Created { record_id: RecordId },
    /// Nothing to do; the catalog already reflects the remote state
    AlreadySynced,
    /// The record was unpublished and stamped as orphaned
    MarkedOrphaned,
    /// The record was permanently deleted
    Removed,
    /// The action could not be applied
    Failed { reason: String },
}

impl RepairOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, RepairOutcome::Failed { .. })
    }
}

/// Per-id result of a repair pass.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RepairResult {
    pub external_asset_id: AssetId,
    #[serde(flatten)]
    pub outcome: RepairOutcome,
}

impl RepairResult {
    pub fn new(external_asset_id: impl Into<AssetId>, outcome: RepairOutcome) -> Self {
        Self {
            external_asset_id: external_asset_id.into(),
            outcome,
        }
    }
}

/// Aggregated counts over a list of repair results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RepairSummary {
    pub total: u64,
    pub created: u64,
    pub marked_orphaned: u64,
    pub removed: u64,
    pub already_synced: u64,
    pub failed: u64,
}

impl RepairSummary {
    /// Tally per-id outcomes into summary counts.
    pub fn from_results(results: &[RepairResult]) -> Self {
        let mut summary = Self {
            total: results.len() as u64,
            ..Self::default()
        };
        for result in results {
            match &result.outcome {
                RepairOutcome::Created { .. } => summary.created += 1,
                RepairOutcome::AlreadySynced => summary.already_synced += 1,
                RepairOutcome::MarkedOrphaned => summary.marked_orphaned += 1,
                RepairOutcome::Removed => summary.removed += 1,
                RepairOutcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }
}

/// How orphaned catalog records should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrphanMode {
    /// Permanently delete the record
    Remove,
    /// Unpublish and stamp the record, preserving history for audit
    #[default]
    MarkOrphaned,
}
