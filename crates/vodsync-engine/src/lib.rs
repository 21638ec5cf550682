//! Video ingestion state machine and catalog reconciliation engines.
//!
//! Four engines share the two collaborator traits from `vodsync-stores`
//! and never share in-process mutable state:
//! - [`UploadVerifier`] watches one freshly submitted asset until it
//!   reaches a terminal state or a timeout elapses.
//! - [`ReconciliationEngine`] bulk-compares the remote source against the
//!   catalog and reports (optionally repairs) the drift.
//! - [`RepairExecutor`] applies idempotent corrective writes for an
//!   explicit list of asset ids.
//! - [`StuckAssetSweeper`] finds uploads stuck past an age threshold and,
//!   outside dry-run mode, deletes them from the remote source.
//!
//! [`IngestService`] wires the four over shared collaborator handles and
//! exposes the operations the HTTP/CLI layer consumes.

pub mod backoff;
pub mod config;
pub mod error;
pub mod listing;
pub mod progress;
pub mod reconcile;
pub mod repair;
pub mod service;
pub mod sweeper;
pub mod verifier;

pub use backoff::{PollBackoff, VerifyBackoff};
pub use config::SyncConfig;
pub use error::{SyncError, SyncResult};
pub use progress::{ChannelProgress, NoopProgress, ProgressSink};
pub use reconcile::ReconciliationEngine;
pub use repair::RepairExecutor;
pub use service::IngestService;
pub use sweeper::{StuckAssetSweeper, SweeperConfig};
pub use verifier::{UploadVerifier, VerifierConfig};
