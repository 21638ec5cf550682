//! Bulk reconciliation between the remote source and the catalog.
//!
//! The two listings are not transactionally linked; the comparison is a
//! best-effort snapshot of two independently evolving stores. The pass
//! itself never mutates state; creation is delegated to the repair
//! executor, and only when `auto_create` is set.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use vodsync_models::{
    AssetId, CatalogRecord, RemoteAsset, RepairOutcome, SyncIssue, SyncIssueKind, SyncReport,
};
use vodsync_stores::{CatalogStore, RemoteAssetSource, SourceError};

use crate::error::SyncResult;
use crate::listing::{list_all_assets, list_all_records};
use crate::repair::RepairExecutor;

/// Durations closer than this are considered equal; providers round
/// differently and sub-second drift is not a discrepancy.
const DURATION_TOLERANCE_SECS: f64 = 0.5;

/// Determines how far the catalog has drifted from the remote source.
pub struct ReconciliationEngine<S, C> {
    source: Arc<S>,
    catalog: Arc<C>,
    repair: RepairExecutor<S, C>,
    page_limit: Option<u32>,
}

impl<S: RemoteAssetSource, C: CatalogStore> ReconciliationEngine<S, C> {
    pub fn new(source: Arc<S>, catalog: Arc<C>) -> Self {
        let repair = RepairExecutor::new(Arc::clone(&source), Arc::clone(&catalog));
        Self {
            source,
            catalog,
            repair,
            page_limit: None,
        }
    }

    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = Some(limit);
        self
    }

    /// Compare both stores and report every discrepancy.
    ///
    /// With `auto_create`, remote assets that are playable but missing
    /// from the catalog are created through the repair path; assets still
    /// processing are only noted. A failure to even begin listing aborts;
    /// later per-page failures truncate the snapshot and are annotated in
    /// the report.
    pub async fn reconcile(&self, auto_create: bool) -> SyncResult<SyncReport> {
        let (assets, mut fetch_errors) = list_all_assets(&*self.source, self.page_limit).await?;
        let (records, record_errors) = list_all_records(&*self.catalog, self.page_limit).await?;
        fetch_errors.extend(record_errors);

        let remote_by_id: HashMap<&AssetId, &RemoteAsset> =
            assets.iter().map(|a| (&a.id, a)).collect();
        let catalog_by_external: HashMap<&AssetId, &CatalogRecord> =
            records.iter().map(|r| (&r.external_asset_id, r)).collect();

        let mut report = SyncReport {
            total_remote: assets.len() as u64,
            total_catalog: records.len() as u64,
            fetch_errors,
            ..SyncReport::default()
        };

        // Deterministic issue order regardless of hash seeds.
        let mut remote_ids: Vec<&AssetId> = remote_by_id.keys().copied().collect();
        remote_ids.sort();
        let mut catalog_ids: Vec<&AssetId> = catalog_by_external.keys().copied().collect();
        catalog_ids.sort();

        let mut auto_create_candidates: Vec<AssetId> = Vec::new();

        for id in &remote_ids {
            let asset = remote_by_id[*id];
            match catalog_by_external.get(*id) {
                None => {
                    report.missing_in_catalog += 1;
                    if auto_create && asset.is_playable() {
                        auto_create_candidates.push((*id).clone());
                    }
                    if let Some(issue) = classify_pair(id, Some(asset), None) {
                        report.issues.push(issue);
                    }
                }
                Some(record) => match classify_pair(id, Some(asset), Some(record)) {
                    Some(issue) => report.issues.push(issue),
                    None => report.in_sync += 1,
                },
            }
        }

        for id in &catalog_ids {
            if !remote_by_id.contains_key(*id) {
                report.missing_in_remote += 1;
                if let Some(issue) = classify_pair(id, None, Some(catalog_by_external[*id])) {
                    report.issues.push(issue);
                }
            }
        }

        if !auto_create_candidates.is_empty() {
            let results = self
                .repair
                .repair_missing(&auto_create_candidates, true)
                .await;
            for result in results {
                let note = match &result.outcome {
                    RepairOutcome::Created { record_id } => {
                        format!("auto-created catalog record {}", record_id)
                    }
                    RepairOutcome::AlreadySynced => "already repaired concurrently".to_string(),
                    RepairOutcome::Failed { reason } => format!("auto-create failed: {}", reason),
                    other => format!("unexpected repair outcome: {:?}", other),
                };
                if let Some(issue) = report
                    .issues
                    .iter_mut()
                    .find(|i| i.external_asset_id == result.external_asset_id)
                {
                    issue.details.push(note);
                }
            }
        }

        info!(
            total_remote = report.total_remote,
            total_catalog = report.total_catalog,
            in_sync = report.in_sync,
            missing_in_catalog = report.missing_in_catalog,
            missing_in_remote = report.missing_in_remote,
            auto_create,
            "reconciliation pass complete"
        );

        Ok(report)
    }

    /// Classify one id, agreeing with the bulk pass by construction: both
    /// paths share [`classify_pair`].
    pub async fn reconcile_one(&self, id: &AssetId) -> SyncResult<Option<SyncIssue>> {
        let asset = match self.source.get(id).await {
            Ok(asset) => Some(asset),
            // Not visible yet classifies like absent; a retry will settle it.
            Err(SourceError::NotFound(_)) | Err(SourceError::NotVisibleYet(_)) => None,
            Err(e) => return Err(e.into()),
        };
        let record = self.catalog.find_by_external_id(id).await?;

        Ok(classify_pair(id, asset.as_ref(), record.as_ref()))
    }

    /// The repair executor this engine delegates creation to.
    pub fn repair(&self) -> &RepairExecutor<S, C> {
        &self.repair
    }
}

/// Shared classification for one (remote, catalog) pair.
///
/// `None` means the id is in sync (or unknown on both sides).
pub fn classify_pair(
    id: &AssetId,
    asset: Option<&RemoteAsset>,
    record: Option<&CatalogRecord>,
) -> Option<SyncIssue> {
    match (asset, record) {
        (None, None) => None,
        (Some(asset), None) => {
            let detail = if asset.is_playable() {
                "asset is ready; catalog record can be created".to_string()
            } else {
                format!("asset still processing ({})", asset.state)
            };
            Some(SyncIssue::new(id.clone(), SyncIssueKind::MissingInCatalog).with_detail(detail))
        }
        (None, Some(record)) => Some(
            SyncIssue::new(id.clone(), SyncIssueKind::MissingInRemote).with_detail(format!(
                "catalog record {} references an asset the remote no longer has",
                record.id
            )),
        ),
        (Some(asset), Some(record)) => {
            let mut details = Vec::new();

            if let Some(name) = &asset.display_name {
                if !name.trim().is_empty() && name != &record.title {
                    details.push(format!(
                        "title differs: remote '{}' vs catalog '{}'",
                        name, record.title
                    ));
                }
            }

            if let (Some(remote_dur), Some(catalog_dur)) =
                (asset.duration_seconds, record.duration_seconds)
            {
                if (remote_dur - catalog_dur).abs() > DURATION_TOLERANCE_SECS {
                    details.push(format!(
                        "duration differs: remote {:.1}s vs catalog {:.1}s",
                        remote_dur, catalog_dur
                    ));
                }
            }

            if details.is_empty() {
                None
            } else {
                let mut issue = SyncIssue::new(id.clone(), SyncIssueKind::DataMismatch);
                issue.details = details;
                Some(issue)
            }
        }
    }
}
