//! Upload verification.
//!
//! Watches one remote asset from submission to a terminal state via a
//! sleep-based polling loop. The only suspension points are the documented
//! sleeps between polls, all owned by the caller's task, so cancellation
//! is the caller's timeout/abort mechanism and nothing runs in the
//! background.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, warn};

use vodsync_models::{AssetId, ProcessingSnapshot, ProcessingState, RemoteAsset, VerifyOutcome};
use vodsync_stores::{RemoteAssetSource, SourceError};

use crate::backoff::{PollBackoff, VerifyBackoff};
use crate::error::{SyncError, SyncResult};
use crate::progress::{NoopProgress, ProgressSink};

/// Verifier tuning knobs.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Overall budget for reaching a terminal state.
    pub timeout: Duration,
    /// A progress snapshot is published every Nth poll.
    pub snapshot_every: u32,
    /// Wait schedule between polls in a known non-terminal state.
    pub backoff: VerifyBackoff,
    /// Wait when the asset has not propagated to read replicas yet.
    pub not_visible_delay: Duration,
    /// Wait after any other transient lookup failure.
    pub lookup_error_delay: Duration,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            snapshot_every: 10,
            backoff: VerifyBackoff::default(),
            not_visible_delay: Duration::from_secs(3),
            lookup_error_delay: Duration::from_secs(1),
        }
    }
}

/// Watches a single newly-submitted asset until it is playable, failed,
/// or the timeout budget is spent.
pub struct UploadVerifier<S> {
    source: Arc<S>,
    config: VerifierConfig,
}

impl<S: RemoteAssetSource> UploadVerifier<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self::with_config(source, VerifierConfig::default())
    }

    pub fn with_config(source: Arc<S>, config: VerifierConfig) -> Self {
        Self { source, config }
    }

    /// Verify without progress reporting.
    pub async fn verify(&self, id: &AssetId) -> SyncResult<VerifyOutcome> {
        self.verify_with_progress(id, &NoopProgress).await
    }

    /// Poll the remote source until the asset reaches a terminal state or
    /// the timeout elapses, publishing a snapshot every Nth poll.
    pub async fn verify_with_progress(
        &self,
        id: &AssetId,
        sink: &dyn ProgressSink,
    ) -> SyncResult<VerifyOutcome> {
        if id.is_empty() {
            return Err(SyncError::invalid_argument("external asset id is empty"));
        }

        let deadline = Instant::now() + self.config.timeout;
        let mut attempt: u32 = 0;

        loop {
            if Instant::now() >= deadline {
                return Ok(self.timed_out(id).await);
            }

            match self.source.get(id).await {
                Ok(asset) => {
                    if let Some(outcome) = terminal_outcome(&asset) {
                        info!(asset_id = %id, state = %asset.state, "asset reached terminal state");
                        return Ok(outcome);
                    }

                    attempt += 1;
                    if self.config.snapshot_every > 0 && attempt % self.config.snapshot_every == 0
                    {
                        sink.publish(ProcessingSnapshot {
                            external_asset_id: id.clone(),
                            state: asset.state,
                            percent_complete: asset.percent_complete,
                            attempt,
                        })
                        .await;
                    }

                    self.sleep_capped(self.config.backoff.next_delay(attempt), deadline)
                        .await;
                }
                // Replication lag: the asset exists but reads don't see it
                // yet. Does not count as a poll attempt.
                Err(SourceError::NotVisibleYet(_)) => {
                    self.sleep_capped(self.config.not_visible_delay, deadline)
                        .await;
                }
                // The caller asked about this specific id and it is gone.
                Err(SourceError::NotFound(_)) => {
                    warn!(asset_id = %id, "asset disappeared from remote source during verification");
                    return Ok(VerifyOutcome::Failed {
                        error_reason: Some("not found in remote source".to_string()),
                        error_code: Some("not_found".to_string()),
                    });
                }
                // Permission problems are not retried.
                Err(e @ SourceError::Unauthorized(_)) => return Err(e.into()),
                Err(e) => {
                    warn!(asset_id = %id, "lookup failed, will retry: {}", e);
                    self.sleep_capped(self.config.lookup_error_delay, deadline)
                        .await;
                }
            }
        }
    }

    /// One final best-effort read after the budget is spent.
    async fn timed_out(&self, id: &AssetId) -> VerifyOutcome {
        let last_known = self.source.get(id).await.ok();
        warn!(
            asset_id = %id,
            last_state = last_known.as_ref().map(|a| a.state.as_str()).unwrap_or("unknown"),
            "verification timed out"
        );
        VerifyOutcome::TimedOut { last_known }
    }

    /// Sleep for `wait`, but never past the deadline.
    async fn sleep_capped(&self, wait: Duration, deadline: Instant) {
        let until = (Instant::now() + wait).min(deadline);
        tokio::time::sleep_until(until).await;
    }
}

/// Terminal classification of one observed snapshot.
fn terminal_outcome(asset: &RemoteAsset) -> Option<VerifyOutcome> {
    match asset.state {
        ProcessingState::Ready if asset.ready_to_stream => Some(VerifyOutcome::Completed {
            asset: asset.clone(),
        }),
        // Ready without the stream flag means manifests are still being
        // written; keep polling.
        ProcessingState::Ready => None,
        ProcessingState::Error => Some(VerifyOutcome::Failed {
            error_reason: asset.error_reason.clone(),
            error_code: asset.error_code.clone(),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_without_stream_flag_is_not_terminal() {
        let mut asset = RemoteAsset::new("a");
        asset.state = ProcessingState::Ready;
        assert!(terminal_outcome(&asset).is_none());

        asset.ready_to_stream = true;
        assert!(matches!(
            terminal_outcome(&asset),
            Some(VerifyOutcome::Completed { .. })
        ));
    }

    #[test]
    fn test_error_state_carries_reason() {
        let mut asset = RemoteAsset::new("a");
        asset.state = ProcessingState::Error;
        asset.error_reason = Some("codec unsupported".to_string());
        asset.error_code = Some("E4001".to_string());

        match terminal_outcome(&asset) {
            Some(VerifyOutcome::Failed {
                error_reason,
                error_code,
            }) => {
                assert_eq!(error_reason.as_deref(), Some("codec unsupported"));
                assert_eq!(error_code.as_deref(), Some("E4001"));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_non_terminal_states() {
        for state in [
            ProcessingState::PendingUpload,
            ProcessingState::Queued,
            ProcessingState::Downloading,
            ProcessingState::InProgress,
        ] {
            let mut asset = RemoteAsset::new("a");
            asset.state = state;
            assert!(terminal_outcome(&asset).is_none(), "{state} must keep polling");
        }
    }
}
