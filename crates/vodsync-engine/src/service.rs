//! Ingest service facade.
//!
//! The operations the HTTP/CLI layer consumes, wired over shared
//! collaborator handles. Each call is an independent, stateless
//! invocation; the engines never share in-process mutable state.

use std::sync::Arc;
use std::time::Duration;

use vodsync_models::{
    AssetId, OrphanMode, RepairResult, RepairSummary, StuckAnalysis, SweepResult, SyncIssue,
    SyncReport, VerifyOutcome,
};
use vodsync_stores::{CatalogStore, RemoteAssetSource};

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::progress::ProgressSink;
use crate::reconcile::ReconciliationEngine;
use crate::repair::RepairExecutor;
use crate::sweeper::StuckAssetSweeper;
use crate::verifier::{UploadVerifier, VerifierConfig};

/// Facade over the four sync engines.
pub struct IngestService<S, C> {
    source: Arc<S>,
    config: SyncConfig,
    reconciler: ReconciliationEngine<S, C>,
    repair: RepairExecutor<S, C>,
    sweeper: StuckAssetSweeper<S>,
}

impl<S: RemoteAssetSource, C: CatalogStore> IngestService<S, C> {
    pub fn new(source: Arc<S>, catalog: Arc<C>) -> Self {
        Self::with_config(source, catalog, SyncConfig::default())
    }

    pub fn with_config(source: Arc<S>, catalog: Arc<C>, config: SyncConfig) -> Self {
        let mut reconciler =
            ReconciliationEngine::new(Arc::clone(&source), Arc::clone(&catalog));
        if let Some(limit) = config.list_page_size {
            reconciler = reconciler.with_page_limit(limit);
        }
        let repair = RepairExecutor::new(Arc::clone(&source), Arc::clone(&catalog));
        let sweeper = StuckAssetSweeper::with_config(Arc::clone(&source), config.sweeper_config());

        Self {
            source,
            config,
            reconciler,
            repair,
            sweeper,
        }
    }

    /// Watch one asset until it reaches a terminal state.
    ///
    /// `timeout_secs` overrides the configured verification budget.
    pub async fn verify_upload(
        &self,
        id: &AssetId,
        timeout_secs: Option<u64>,
    ) -> SyncResult<VerifyOutcome> {
        let verifier = self.verifier_for(timeout_secs)?;
        verifier.verify(id).await
    }

    /// Verification with progress snapshots for UI feedback.
    pub async fn verify_upload_with_progress(
        &self,
        id: &AssetId,
        timeout_secs: Option<u64>,
        sink: &dyn ProgressSink,
    ) -> SyncResult<VerifyOutcome> {
        let verifier = self.verifier_for(timeout_secs)?;
        verifier.verify_with_progress(id, sink).await
    }

    /// Read-only reconciliation: report drift, mutate nothing.
    pub async fn get_sync_status(&self) -> SyncResult<SyncReport> {
        self.reconciler.reconcile(false).await
    }

    /// Full reconciliation pass, optionally creating missing records.
    pub async fn run_sync(&self, auto_create: bool) -> SyncResult<SyncReport> {
        self.reconciler.reconcile(auto_create).await
    }

    /// Classify a single asset id against both stores.
    pub async fn check_asset(&self, id: &AssetId) -> SyncResult<Option<SyncIssue>> {
        self.reconciler.reconcile_one(id).await
    }

    /// Create missing catalog records for the given ids.
    pub async fn repair_assets(
        &self,
        ids: &[AssetId],
        auto_fix: bool,
    ) -> (RepairSummary, Vec<RepairResult>) {
        let results = self.repair.repair_missing(ids, auto_fix).await;
        (RepairSummary::from_results(&results), results)
    }

    /// Mark or remove orphaned catalog records for the given ids.
    pub async fn handle_orphaned_records(
        &self,
        ids: &[AssetId],
        mode: OrphanMode,
    ) -> (RepairSummary, Vec<RepairResult>) {
        let results = self.repair.handle_orphans(ids, mode).await;
        (RepairSummary::from_results(&results), results)
    }

    /// Pure-read stuck-upload analysis.
    pub async fn analyze_stuck_uploads(
        &self,
        max_age_hours: Option<f64>,
    ) -> SyncResult<StuckAnalysis> {
        self.sweeper
            .analyze(max_age_hours.unwrap_or(self.config.default_max_age_hours))
            .await
    }

    /// Sweep stuck uploads; dry-run unless explicitly disabled.
    pub async fn sweep_stuck_uploads(
        &self,
        max_age_hours: Option<f64>,
        dry_run: bool,
    ) -> SyncResult<SweepResult> {
        self.sweeper
            .sweep(max_age_hours.unwrap_or(self.config.default_max_age_hours), dry_run)
            .await
    }

    fn verifier_for(&self, timeout_secs: Option<u64>) -> SyncResult<UploadVerifier<S>> {
        if let Some(0) = timeout_secs {
            return Err(SyncError::invalid_argument("timeout must be positive"));
        }
        let mut verifier_config: VerifierConfig = self.config.verifier_config();
        if let Some(secs) = timeout_secs {
            verifier_config.timeout = Duration::from_secs(secs);
        }
        Ok(UploadVerifier::with_config(
            Arc::clone(&self.source),
            verifier_config,
        ))
    }
}
