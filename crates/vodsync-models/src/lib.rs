//! Shared data models for the VodSync backend.
//!
//! This crate provides Serde-serializable types for:
//! - Remote assets held by the external processing service
//! - Catalog records (the internal system of record)
//! - Reconciliation reports and repair results
//! - Upload verification outcomes
//! - Stuck-upload analysis and sweep results

pub mod asset;
pub mod catalog;
pub mod report;
pub mod sweep;
pub mod verify;

// Re-export common types
pub use asset::{AssetId, ProcessingState, RemoteAsset};
pub use catalog::{CatalogRecord, RecordId, SourceSnapshot, SyncProvenance, SyncStatus};
pub use report::{
    OrphanMode, RepairOutcome, RepairResult, RepairSummary, SyncIssue, SyncIssueKind, SyncReport,
};
pub use sweep::{CleanupCandidate, StuckAnalysis, SweepItem, SweepResult};
pub use verify::{ProcessingSnapshot, VerifyOutcome};
