//! Upload verification outcomes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::asset::{AssetId, ProcessingState, RemoteAsset};

/// Final result of watching one asset to a terminal state.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum VerifyOutcome {
    /// Asset reached `Ready` with playable renditions
    Completed { asset: RemoteAsset },
    /// Asset reached `Error`
    Failed {
        #[serde(skip_serializing_if = "Option::is_none")]
        error_reason: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error_code: Option<String>,
    },
    /// Timeout elapsed before a terminal state was observed
    TimedOut {
        /// Best-effort final read; absent when the last read also failed
        #[serde(skip_serializing_if = "Option::is_none")]
        last_known: Option<RemoteAsset>,
    },
}

impl VerifyOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, VerifyOutcome::Completed { .. })
    }
}

/// Intermediate progress snapshot published while verification runs.
///
/// Emitted every Nth poll so a caller can surface progress without waiting
/// for the final outcome.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProcessingSnapshot {
    pub external_asset_id: AssetId,
    pub state: ProcessingState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<u8>,
    /// Poll attempt the snapshot was taken on
    pub attempt: u32,
}
