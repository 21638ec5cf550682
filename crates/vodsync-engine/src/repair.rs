//! Corrective writes for an explicit list of asset ids.
//!
//! The existence check and the conflict-as-success insert live here and
//! nowhere else; call sites are not allowed to re-implement them, which
//! keeps the one-record-per-asset idempotency invariant in one place.
//! Every write is a single-record operation guarded by the store's
//! uniqueness constraint; no locks are assumed or required.

use std::sync::Arc;

use chrono::Utc;
use metrics::counter;
use tracing::{info, warn};

use vodsync_models::{AssetId, CatalogRecord, OrphanMode, RepairOutcome, RepairResult, SyncStatus};
use vodsync_stores::{CatalogPatch, CatalogStore, RemoteAssetSource, SourceError, StoreError};

/// Applies create/mark/remove repairs per asset id.
///
/// Batch methods never abort on a per-item failure; every id gets an
/// entry in the returned list.
pub struct RepairExecutor<S, C> {
    source: Arc<S>,
    catalog: Arc<C>,
}

impl<S: RemoteAssetSource, C: CatalogStore> RepairExecutor<S, C> {
    pub fn new(source: Arc<S>, catalog: Arc<C>) -> Self {
        Self { source, catalog }
    }

    /// Create catalog records for remote assets that have none.
    ///
    /// With `auto_fix` unset this is a dry run: each actionable id reports
    /// `Failed("auto-fix disabled")` instead of writing.
    pub async fn repair_missing(&self, ids: &[AssetId], auto_fix: bool) -> Vec<RepairResult> {
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            let outcome = self.repair_one(id, auto_fix).await;
            counter!("catalog_repair_total", "outcome" => outcome_label(&outcome)).increment(1);
            results.push(RepairResult::new(id.clone(), outcome));
        }
        results
    }

    async fn repair_one(&self, id: &AssetId, auto_fix: bool) -> RepairOutcome {
        if id.is_empty() {
            return RepairOutcome::failed("empty asset id");
        }

        match self.catalog.find_by_external_id(id).await {
            Ok(Some(_)) => return RepairOutcome::AlreadySynced,
            Ok(None) => {}
            Err(e) => return RepairOutcome::failed(format!("catalog lookup failed: {}", e)),
        }

        let asset = match self.source.get(id).await {
            Ok(asset) => asset,
            Err(SourceError::NotFound(_)) => {
                return RepairOutcome::failed("not found in remote");
            }
            Err(e) => return RepairOutcome::failed(format!("remote lookup failed: {}", e)),
        };

        if !auto_fix {
            return RepairOutcome::failed("auto-fix disabled");
        }

        if !asset.is_playable() {
            return RepairOutcome::failed("not ready to stream");
        }

        let record = CatalogRecord::from_remote(&asset);
        match self.catalog.insert(record).await {
            Ok(created) => {
                info!(
                    asset_id = %id,
                    record_id = %created.id,
                    title = %created.title,
                    "created catalog record from remote metadata"
                );
                RepairOutcome::Created {
                    record_id: created.id,
                }
            }
            // A concurrent repair won the race; the catalog is correct.
            Err(e) if e.is_conflict() => RepairOutcome::AlreadySynced,
            Err(e) => {
                warn!(asset_id = %id, "catalog insert failed: {}", e);
                RepairOutcome::failed(format!("catalog insert failed: {}", e))
            }
        }
    }

    /// Handle catalog records whose remote asset no longer resolves.
    ///
    /// `MarkOrphaned` unpublishes and stamps the record, preserving
    /// history for audit; `Remove` deletes it. Both are idempotent:
    /// repeating the call on an already-handled id is a no-op success.
    pub async fn handle_orphans(&self, ids: &[AssetId], mode: OrphanMode) -> Vec<RepairResult> {
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            let outcome = self.orphan_one(id, mode).await;
            counter!(
                "catalog_orphan_total",
                "mode" => mode_label(mode),
                "outcome" => outcome_label(&outcome)
            )
            .increment(1);
            results.push(RepairResult::new(id.clone(), outcome));
        }
        results
    }

    async fn orphan_one(&self, id: &AssetId, mode: OrphanMode) -> RepairOutcome {
        let record = match self.catalog.find_by_external_id(id).await {
            Ok(Some(record)) => record,
            // Nothing references this asset; a previous pass already
            // handled it.
            Ok(None) => return RepairOutcome::AlreadySynced,
            Err(e) => return RepairOutcome::failed(format!("catalog lookup failed: {}", e)),
        };

        // Confirm the asset is actually gone before touching the record;
        // a time-skewed reconciliation snapshot must not unpublish or
        // delete a live video.
        match self.source.get(id).await {
            Err(SourceError::NotFound(_)) => {}
            Ok(_) => return RepairOutcome::failed("asset still present in remote source"),
            Err(SourceError::NotVisibleYet(_)) => {
                return RepairOutcome::failed("asset visibility unconfirmed");
            }
            Err(e) => return RepairOutcome::failed(format!("remote lookup failed: {}", e)),
        }

        match mode {
            OrphanMode::MarkOrphaned => {
                if record.sync_status() == SyncStatus::Orphaned && !record.is_published {
                    return RepairOutcome::AlreadySynced;
                }
                let patch =
                    CatalogPatch::orphan("remote asset no longer resolves", Utc::now());
                match self.catalog.update(&record.id, patch).await {
                    Ok(_) => {
                        info!(asset_id = %id, record_id = %record.id, "marked catalog record orphaned");
                        RepairOutcome::MarkedOrphaned
                    }
                    // Removed concurrently; either way it is handled.
                    Err(StoreError::NotFound(_)) => RepairOutcome::AlreadySynced,
                    Err(e) => RepairOutcome::failed(format!("catalog update failed: {}", e)),
                }
            }
            OrphanMode::Remove => match self.catalog.delete(&record.id).await {
                Ok(()) => {
                    info!(asset_id = %id, record_id = %record.id, "removed orphaned catalog record");
                    RepairOutcome::Removed
                }
                Err(StoreError::NotFound(_)) => RepairOutcome::AlreadySynced,
                Err(e) => RepairOutcome::failed(format!("catalog delete failed: {}", e)),
            },
        }
    }
}

fn outcome_label(outcome: &RepairOutcome) -> &'static str {
    match outcome {
        RepairOutcome::Created { .. } => "created",
        RepairOutcome::AlreadySynced => "already_synced",
        RepairOutcome::MarkedOrphaned => "marked_orphaned",
        RepairOutcome::Removed => "removed",
        RepairOutcome::Failed { .. } => "failed",
    }
}

fn mode_label(mode: OrphanMode) -> &'static str {
    match mode {
        OrphanMode::Remove => "remove",
        OrphanMode::MarkOrphaned => "mark",
    }
}
