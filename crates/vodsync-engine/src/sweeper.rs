//! Stuck-upload analysis and cleanup.
//!
//! Uploads abandoned in `PendingUpload` never transition on their own and
//! pollute every reconciliation pass. Analysis is a pure read and always
//! safe; deletion requires explicitly leaving dry-run mode.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use metrics::counter;
use tracing::{info, warn};

use vodsync_models::{
    CleanupCandidate, ProcessingState, StuckAnalysis, SweepItem, SweepResult,
};
use vodsync_stores::RemoteAssetSource;

use crate::error::SyncResult;
use crate::listing::list_all_assets;

/// Sweeper tuning knobs.
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// Pause between consecutive deletes, respecting remote rate limits.
    pub delete_delay: Duration,
    /// Page size for the remote listing.
    pub page_limit: Option<u32>,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            delete_delay: Duration::from_millis(500),
            page_limit: None,
        }
    }
}

/// Finds and optionally removes uploads stuck past an age threshold.
pub struct StuckAssetSweeper<S> {
    source: Arc<S>,
    config: SweeperConfig,
}

impl<S: RemoteAssetSource> StuckAssetSweeper<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self::with_config(source, SweeperConfig::default())
    }

    pub fn with_config(source: Arc<S>, config: SweeperConfig) -> Self {
        Self { source, config }
    }

    /// Count every asset by state and flag `PendingUpload` assets older
    /// than the threshold. Pure read, no mutation.
    ///
    /// Per-page listing failures truncate the snapshot and are recorded in
    /// `fetch_errors`; a caller must treat a non-empty list as a partial
    /// view of the upload population.
    pub async fn analyze(&self, max_age_hours: f64) -> SyncResult<StuckAnalysis> {
        let (assets, errors) = list_all_assets(&*self.source, self.config.page_limit).await?;
        for error in &errors {
            warn!("stuck-upload analysis on a truncated listing: {}", error);
        }

        let now = Utc::now();
        let mut analysis = StuckAnalysis {
            max_age_hours,
            fetch_errors: errors,
            ..StuckAnalysis::default()
        };

        for asset in &assets {
            *analysis.counts_by_state.entry(asset.state).or_insert(0) += 1;

            if asset.state == ProcessingState::PendingUpload
                && asset.age_hours(now) > max_age_hours
            {
                analysis
                    .candidates
                    .push(CleanupCandidate::from_asset(asset, now));
            }
        }

        info!(
            total = analysis.total_assets(),
            stuck = analysis.candidates.len(),
            max_age_hours,
            "stuck-upload analysis complete"
        );

        Ok(analysis)
    }

    /// Delete stuck uploads from the remote source.
    ///
    /// Dry-run (the default posture) reports candidates without issuing a
    /// single delete. Live mode deletes one candidate at a time with an
    /// inter-call delay; one failure never stops the rest of the sweep.
    pub async fn sweep(&self, max_age_hours: f64, dry_run: bool) -> SyncResult<SweepResult> {
        let analysis = self.analyze(max_age_hours).await?;

        let mut result = SweepResult {
            total_stuck: analysis.candidates.len() as u64,
            dry_run,
            fetch_errors: analysis.fetch_errors.clone(),
            ..SweepResult::default()
        };

        if dry_run {
            result.items = analysis
                .candidates
                .iter()
                .map(|c| SweepItem {
                    id: c.id.clone(),
                    deleted: false,
                    error: None,
                })
                .collect();
            info!(stuck = result.total_stuck, "sweep dry run, nothing deleted");
            return Ok(result);
        }

        for (index, candidate) in analysis.candidates.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.config.delete_delay).await;
            }

            match self.source.delete(&candidate.id).await {
                Ok(()) => {
                    result.deleted += 1;
                    counter!("stuck_sweep_total", "outcome" => "deleted").increment(1);
                    info!(
                        asset_id = %candidate.id,
                        age_hours = candidate.age_hours,
                        "deleted stuck upload"
                    );
                    result.items.push(SweepItem {
                        id: candidate.id.clone(),
                        deleted: true,
                        error: None,
                    });
                }
                Err(e) => {
                    result.failed += 1;
                    counter!("stuck_sweep_total", "outcome" => "failed").increment(1);
                    warn!(asset_id = %candidate.id, "failed to delete stuck upload: {}", e);
                    result.items.push(SweepItem {
                        id: candidate.id.clone(),
                        deleted: false,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        info!(
            stuck = result.total_stuck,
            deleted = result.deleted,
            failed = result.failed,
            "sweep complete"
        );

        Ok(result)
    }
}
