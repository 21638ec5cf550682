//! Progress publication seam.
//!
//! Verification is a blocking polling loop by design; callers that want
//! UI feedback inject a sink and receive periodic snapshots instead of
//! waiting for the final outcome.

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use vodsync_models::ProcessingSnapshot;

/// Receives intermediate processing snapshots during verification.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn publish(&self, snapshot: ProcessingSnapshot);
}

/// Sink that drops every snapshot. Used when no caller is watching.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

#[async_trait]
impl ProgressSink for NoopProgress {
    async fn publish(&self, snapshot: ProcessingSnapshot) {
        debug!(
            asset_id = %snapshot.external_asset_id,
            state = %snapshot.state,
            attempt = snapshot.attempt,
            "verification progress"
        );
    }
}

/// Sink that forwards snapshots over an unbounded channel.
///
/// A closed receiver is not an error; the verifier keeps running and the
/// remaining snapshots are dropped.
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    sender: UnboundedSender<ProcessingSnapshot>,
}

impl ChannelProgress {
    pub fn new(sender: UnboundedSender<ProcessingSnapshot>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl ProgressSink for ChannelProgress {
    async fn publish(&self, snapshot: ProcessingSnapshot) {
        let _ = self.sender.send(snapshot);
    }
}
